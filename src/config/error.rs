use crate::mapping::MapError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_saphyr::Error),
    #[error("validation errors:\n{}", .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    #[error("view '{name}': {source}")]
    View {
        name: String,
        #[source]
        source: MapError,
    },
    #[error("unknown view: {0}")]
    UnknownView(String),
}
