//! Score identity decomposition
//!
//! SymbTr score names join five slugs with `--`:
//! `makam--form--usul--title--composer`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use symbtr_common::{AttributeKind, Error, Result};

/// Field separator in SymbTr score names
pub const SCORE_NAME_DELIMITER: &str = "--";

/// The five positional parts of a score name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreIdentity {
    pub makam: String,
    pub form: String,
    pub usul: String,
    pub title: String,
    pub composer: String,
}

impl ScoreIdentity {
    /// Split a score name into its five parts
    ///
    /// Fewer than five parts is a [`Error::MalformedIdentifier`]; parts
    /// after the fifth are ignored.
    pub fn parse(score_name: &str) -> Result<Self> {
        let parts: Vec<&str> = score_name.split(SCORE_NAME_DELIMITER).collect();

        match parts.as_slice() {
            [makam, form, usul, title, composer, ..] => Ok(Self {
                makam: makam.to_string(),
                form: form.to_string(),
                usul: usul.to_string(),
                title: title.to_string(),
                composer: composer.to_string(),
            }),
            _ => Err(Error::MalformedIdentifier {
                name: score_name.to_string(),
                parts: parts.len(),
            }),
        }
    }

    /// Slug of a categorical attribute
    pub fn slug(&self, kind: AttributeKind) -> &str {
        match kind {
            AttributeKind::Makam => &self.makam,
            AttributeKind::Form => &self.form,
            AttributeKind::Usul => &self.usul,
        }
    }
}

impl FromStr for ScoreIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ScoreIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.makam,
            self.form,
            self.usul,
            self.title,
            self.composer,
            d = SCORE_NAME_DELIMITER
        )
    }
}
