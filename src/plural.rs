//! 複数形の選択
//!
//! `.ts` ファイルは複数形の訳文を `<numerusform>` の列として持つ。
//! 件数に対してどれを使うかは翻訳先の言語で決まり、以下の規則は Qt Linguist に従う。

/// Plural rule family of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// A single form for every count (Chinese, Japanese, Korean, ...).
    Invariant,
    /// `n == 1` and everything else (English, German, Spanish, ...).
    OneOther,
    /// `n <= 1` and everything else (French, Brazilian Portuguese, ...).
    ZeroOneOther,
    /// Russian, Ukrainian, Belarusian, Serbian, Croatian, Bosnian.
    EastSlavic,
    /// Polish.
    Polish,
    /// Czech and Slovak.
    Czech,
    /// Slovenian: 1, 2, 3-4 and everything else.
    Slovenian,
    /// Lithuanian.
    Lithuanian,
    /// Latvian: 0, singular, plural.
    Latvian,
    /// Romanian.
    Romanian,
    /// Irish: 1, 2 and everything else.
    Irish,
    /// Arabic: six forms.
    Arabic,
}

impl PluralRule {
    /// Picks the rule for a language code such as `zh`, `fr_FR` or `pt-BR`.
    ///
    /// Unknown languages get [`PluralRule::OneOther`].
    #[must_use]
    pub fn for_language(code: &str) -> Self {
        let normalized = code.to_ascii_lowercase().replace('-', "_");
        if normalized == "pt_br" {
            return Self::ZeroOneOther;
        }
        let base = normalized.split('_').next().unwrap_or_default();
        match base {
            "zh" | "ja" | "ko" | "vi" | "th" | "id" | "ms" | "tr" | "fa" | "ka" | "lo" | "my"
            | "km" | "bo" | "dz" => Self::Invariant,
            "fr" | "ak" | "am" | "bh" | "fil" | "tl" | "hy" | "ln" | "mg" | "ti" | "wa" => {
                Self::ZeroOneOther
            }
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            "sl" => Self::Slovenian,
            "lt" => Self::Lithuanian,
            "lv" => Self::Latvian,
            "ro" | "mo" => Self::Romanian,
            "ga" => Self::Irish,
            "ar" => Self::Arabic,
            _ => Self::OneOther,
        }
    }

    /// 完全な訳文が持つ複数形の数
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Invariant => 1,
            Self::OneOther | Self::ZeroOneOther => 2,
            Self::EastSlavic
            | Self::Polish
            | Self::Czech
            | Self::Lithuanian
            | Self::Latvian
            | Self::Romanian
            | Self::Irish => 3,
            Self::Slovenian => 4,
            Self::Arabic => 6,
        }
    }

    /// `n` に使う複数形のインデックス
    #[must_use]
    pub const fn form_index(self, n: u64) -> usize {
        let n10 = n % 10;
        let n100 = n % 100;
        match self {
            Self::Invariant => 0,
            Self::OneOther => {
                if n == 1 { 0 } else { 1 }
            }
            Self::ZeroOneOther => {
                if n <= 1 { 0 } else { 1 }
            }
            Self::EastSlavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && n10 <= 4 && (n100 < 10 || n100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if n10 >= 2 && n10 <= 4 && (n100 < 10 || n100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Slovenian => match n100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Lithuanian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && (n100 < 10 || n100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if n == 0 {
                    0
                } else if n10 == 1 && n100 != 11 {
                    1
                } else {
                    2
                }
            }
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (n100 >= 1 && n100 <= 19) {
                    1
                } else {
                    2
                }
            }
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            Self::Arabic => {
                if n == 0 {
                    0
                } else if n == 1 {
                    1
                } else if n == 2 {
                    2
                } else if n100 >= 3 && n100 <= 10 {
                    3
                } else if n100 >= 11 {
                    4
                } else {
                    5
                }
            }
        }
    }
}
