use std::collections::HashMap;

use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;

use crate::{Error, Res, types::Image};

/// Random value for the `state` parameter of the authorization request.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Host and port the callback server has to listen on for `redirect`.
pub fn callback_address(redirect: &Url) -> Res<(String, u16)> {
    let host = redirect
        .host_str()
        .ok_or_else(|| Error::Config(format!("redirect_uri {redirect} has no host")))?;
    let port = redirect
        .port_or_known_default()
        .ok_or_else(|| Error::Config(format!("redirect_uri {redirect} has no port")))?;
    Ok((host.trim_matches(['[', ']']).to_string(), port))
}

/// The image with the smallest width. Images without a width sort last.
pub fn smallest_image(images: &[Image]) -> Option<&Image> {
    images
        .iter()
        .min_by_key(|image| image.width.unwrap_or(u32::MAX))
}

/// Replaces `{name}` placeholders in `template` with the matching values.
///
/// `{{` and `}}` produce literal braces. A placeholder naming a field that is
/// not in `values` fails with [`Error::FieldNotFound`].
pub fn interpolate(template: &str, values: &HashMap<String, String>) -> Res<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(Error::FieldNotFound(format!(
                                "{{{name} (unterminated placeholder)"
                            )));
                        }
                    }
                }
                let value = values
                    .get(name.trim())
                    .ok_or_else(|| Error::FieldNotFound(name.trim().to_string()))?;
                out.push_str(value);
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
