use clap::ValueEnum;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Serialized reference summary
    #[default]
    Json,
    /// Pull-request comment body
    Markdown,
}

impl OutputFormat {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }
}
