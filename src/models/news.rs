use serde::{Deserialize, Serialize};

/// Raw record as returned by the search collaborator, before any filtering
/// or reshaping. Field names follow the result-card contents of the news
/// search page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResult {
    pub title: String,
    /// Relative display date, e.g. "3 horas atrás".
    pub date: String,
    /// Outlet/source name.
    pub media: String,
    pub desc: String,
    pub link: String,
}

/// Final response unit, serialized with the Portuguese wire keys of the
/// original service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsRecord {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    /// Original display string; the resolved timestamp is only a sort key.
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "fonte")]
    pub source: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    /// Canonical link, tracking parameters stripped.
    pub link: String,
    #[serde(rename = "imagem")]
    pub image: Option<String>,
    #[serde(rename = "termo_busca")]
    pub search_term: String,
}
