use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    HtmlParse(String),
    HoursParse(String),
    /// A failure attributed to a specific meal once its name is known.
    Meal { name: String, source: Box<Error> },
}

impl Error {
    pub fn html_parse_error(msg: impl Into<String>) -> Self {
        Self::HtmlParse(msg.into())
    }

    pub fn hours_parse_error(msg: impl Into<String>) -> Self {
        Self::HoursParse(msg.into())
    }

    /// Attaches the owning meal's name. An error already attributed to a
    /// meal keeps its original attribution.
    #[must_use]
    pub fn for_meal(self, name: &str) -> Self {
        match self {
            attributed @ Self::Meal { .. } => attributed,
            source => Self::Meal {
                name: name.to_string(),
                source: Box::new(source),
            },
        }
    }

    pub fn meal_name(&self) -> Option<&str> {
        match self {
            Self::Meal { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
            Self::HoursParse(msg) => write!(f, "Hours parse error: {msg}"),
            Self::Meal { name, source } => write!(f, "Error in meal `{name}`: {source}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
