use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    /// `None` for anonymous functions
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_async: bool,
    /// Raw parameter list text
    pub parameters: String,
    pub line: usize,
    pub end_line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MethodInfo {
    pub name: String,
    pub is_static: bool,
    pub is_async: bool,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    pub name: String,
    pub is_static: bool,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub line: usize,
    pub end_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<MethodInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyInfo>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportedNameInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    pub source: String,
    pub names: Vec<ImportedNameInfo>,
    pub is_type_only: bool,
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub name: String,
    pub kind: String,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScopeInfo {
    pub id: usize,
    pub parent: Option<usize>,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_line: usize,
    pub end_line: usize,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScopeReport {
    pub language: String,
    pub scopes: Vec<ScopeInfo>,
}
