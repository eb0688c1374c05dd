//! Configuration for reading tables

/// Output format for rendered rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Where column headers come from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HeaderMode {
    /// Detect the header row from a sample
    #[default]
    Guess,
    /// No headers; rows stay unlabeled
    None,
    /// Caller-supplied names
    Explicit(Vec<String>),
}

/// Default number of raw rows sampled for guessing
pub const DEFAULT_WINDOW: usize = 1000;

/// Configuration for reading and preparing tables
#[derive(Debug, Clone)]
pub struct Config {
    /// Field delimiter for delimited text; sniffed when unset
    pub delimiter: Option<u8>,
    /// Quote character for delimited text
    pub quote: u8,
    /// Raw rows sampled for header and type guessing
    pub window: usize,
    /// Leading rows skipped before anything else
    pub row_offset: Option<usize>,
    pub headers: HeaderMode,
    /// Infer column types from the sample
    pub guess_types: bool,
    /// Only accept a guessed type that fits every sampled value
    pub strict_types: bool,
    /// Restrict output to one table (sheet name or CSV stem)
    pub table_name: Option<String>,
    /// Maximum rows rendered per table
    pub limit: Option<usize>,
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            window: DEFAULT_WINDOW,
            row_offset: None,
            headers: HeaderMode::default(),
            guess_types: false,
            strict_types: false,
            table_name: None,
            limit: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Set the sample window used for guessing
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Skip leading rows
    pub fn with_row_offset(mut self, offset: usize) -> Self {
        self.row_offset = Some(offset);
        self
    }

    /// Set the header mode
    pub fn with_headers(mut self, headers: HeaderMode) -> Self {
        self.headers = headers;
        self
    }

    /// Enable type guessing
    pub fn with_guess_types(mut self, guess: bool) -> Self {
        self.guess_types = guess;
        self
    }

    /// Require guessed types to fit every sampled value
    pub fn with_strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    /// Select a single table
    pub fn with_table_name(mut self, name: String) -> Self {
        self.table_name = Some(name);
        self
    }

    /// Limit rendered rows
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("terminal".parse::<OutputFormat>(), Ok(OutputFormat::Terminal));
        assert!("html".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_delimiter(b';')
            .with_row_offset(2)
            .with_headers(HeaderMode::None)
            .with_guess_types(true);
        assert_eq!(config.delimiter, Some(b';'));
        assert_eq!(config.row_offset, Some(2));
        assert_eq!(config.headers, HeaderMode::None);
        assert!(config.guess_types);
        assert_eq!(config.window, DEFAULT_WINDOW);
    }
}
