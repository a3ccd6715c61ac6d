//! Identifier case conversion for selected text.

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextCase {
    /// `userName`
    Camel,
    /// `UserName`
    Pascal,
    /// `user_name`
    Snake,
    /// `user-name`
    Dash,
}

impl TextCase {
    pub const ALL: [TextCase; 4] = [Self::Camel, Self::Pascal, Self::Snake, Self::Dash];

    /// Name used in command identifiers (`transformTo<Name>Case`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Camel => "Camel",
            Self::Pascal => "Pascal",
            Self::Snake => "Snake",
            Self::Dash => "Dash",
        }
    }

    /// Split `text` into words on case changes and separators, then join
    /// them in this case. Punctuation and whitespace between words is dropped.
    pub fn convert(self, text: &str) -> String {
        match self {
            Self::Camel => text.to_lower_camel_case(),
            Self::Pascal => text.to_upper_camel_case(),
            Self::Snake => text.to_snake_case(),
            Self::Dash => text.to_kebab_case(),
        }
    }
}
