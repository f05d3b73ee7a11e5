//! `LocalizedText`: a default `(locale, text)` pair plus an optional
//! ordered list of additional `(locale, text)` pairs, with locale
//! negotiation helpers used before a value is ever put on the wire.
//!
//! Only the default pair is ever transmitted -- OPC UA Binary's
//! `LocalizedText` wire form is a single locale/text pair selected ahead of
//! time by [`LocalizedText::preferred_locale`]; the additional list is
//! server-side bookkeeping for multi-locale node attributes, grounded on
//! the `AddOrSetLocale`/`GetPreferredLocale` contract in spec.md §4.2.

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::codec::bytes::UaString;
use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::error::{Error, Result};

mod encoding_mask {
    pub const LOCALE: u8 = 0x01;
    pub const TEXT: u8 = 0x02;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalizedText {
    default_locale: UaString,
    default_text: UaString,
    additional: Vec<(UaString, UaString)>,
}

impl LocalizedText {
    pub fn new(locale: impl Into<UaString>, text: impl Into<UaString>) -> Self {
        LocalizedText {
            default_locale: locale.into(),
            default_text: text.into(),
            additional: Vec::new(),
        }
    }

    pub fn default_pair(&self) -> (&UaString, &UaString) {
        (&self.default_locale, &self.default_text)
    }

    pub fn additional_pairs(&self) -> &[(UaString, UaString)] {
        &self.additional
    }

    fn is_empty_request(locale: &str, text: &str) -> bool {
        locale.is_empty() && text.is_empty()
    }

    /// Normalize a `(locale, text)` request against `supported_locales`, per
    /// the four-way rule in spec.md §4.2.
    pub fn add_or_set_locale(
        &mut self,
        locale: &str,
        text: &str,
        supported_locales: &[&str],
    ) -> Result<()> {
        if Self::is_empty_request(locale, text) {
            self.default_locale = UaString::null();
            self.default_text = UaString::null();
            self.additional.clear();
            return Ok(());
        }

        let known = supported_locales.iter().any(|&l| l == locale);

        if text.is_empty() {
            // Remove the entry, if any.
            if self.default_locale.as_str() == Some(locale) {
                if self.additional.is_empty() {
                    self.default_locale = UaString::null();
                    self.default_text = UaString::null();
                } else {
                    let (promoted_locale, promoted_text) = self.additional.remove(0);
                    self.default_locale = promoted_locale;
                    self.default_text = promoted_text;
                }
            } else {
                self.additional.retain(|(l, _)| l.as_str() != Some(locale));
            }
            return Ok(());
        }

        if !known {
            return Err(Error::invalid_parameters(format!(
                "locale '{locale}' is not in the supported-locales list"
            )));
        }

        if self.default_locale.is_null() || self.default_locale.as_str() == Some(locale) {
            self.default_locale = UaString::from_string(locale.to_string());
            self.default_text = UaString::from_string(text.to_string());
            return Ok(());
        }

        if let Some(entry) = self
            .additional
            .iter_mut()
            .find(|(l, _)| l.as_str() == Some(locale))
        {
            entry.1 = UaString::from_string(text.to_string());
        } else {
            self.additional.push((
                UaString::from_string(locale.to_string()),
                UaString::from_string(text.to_string()),
            ));
        }
        Ok(())
    }

    fn language_only(locale: &str) -> &str {
        locale.split('-').next().unwrap_or(locale)
    }

    /// Walk `preferred` twice -- exact match, then language-only match --
    /// falling back to the default pair.
    pub fn preferred_locale(&self, preferred: &[&str]) -> (&UaString, &UaString) {
        let candidates = std::iter::once((&self.default_locale, &self.default_text))
            .chain(self.additional.iter().map(|(l, t)| (l, t)));

        for &want in preferred {
            for (locale, text) in candidates.clone() {
                if locale.as_str() == Some(want) {
                    return (locale, text);
                }
            }
        }
        for &want in preferred {
            let want_lang = Self::language_only(want);
            for (locale, text) in candidates.clone() {
                if let Some(l) = locale.as_str() {
                    if Self::language_only(l) == want_lang {
                        return (locale, text);
                    }
                }
            }
        }
        (&self.default_locale, &self.default_text)
    }

    pub fn is_null(&self) -> bool {
        self.default_locale.is_null() && self.default_text.is_null() && self.additional.is_empty()
    }

    /// Compares the default `(locale, text)` pair only -- the only part of
    /// a `LocalizedText` that is ever transmitted.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.default_locale
            .as_str()
            .cmp(&other.default_locale.as_str())
            .then_with(|| self.default_text.as_str().cmp(&other.default_text.as_str()))
    }
}

impl BinaryEncode for LocalizedText {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        1 + if self.default_locale.is_null() {
            0
        } else {
            self.default_locale.byte_len(ctx)
        } + if self.default_text.is_null() {
            0
        } else {
            self.default_text.byte_len(ctx)
        }
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        let mut mask = 0u8;
        if !self.default_locale.is_null() {
            mask |= encoding_mask::LOCALE;
        }
        if !self.default_text.is_null() {
            mask |= encoding_mask::TEXT;
        }
        mask.encode(stream, ctx)?;
        if mask & encoding_mask::LOCALE != 0 {
            self.default_locale.encode(stream, ctx)?;
        }
        if mask & encoding_mask::TEXT != 0 {
            self.default_text.encode(stream, ctx)?;
        }
        Ok(())
    }
}

impl BinaryDecode for LocalizedText {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let mask = u8::decode(stream, ctx)?;
        let default_locale = if mask & encoding_mask::LOCALE != 0 {
            UaString::decode(stream, ctx)?
        } else {
            UaString::null()
        };
        let default_text = if mask & encoding_mask::TEXT != 0 {
            UaString::decode(stream, ctx)?
        } else {
            UaString::null()
        };
        Ok(LocalizedText {
            default_locale,
            default_text,
            additional: Vec::new(),
        })
    }
}
