//! Share-link codec: a custom recipe squeezed into a URL-safe token.
//! Deflate keeps long step lists inside typical URL budgets; the version
//! prefix leaves room to change the payload without breaking old links.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use log::warn;
use miniz_oxide::deflate::compress_to_vec;
use miniz_oxide::inflate::decompress_to_vec_with_limit;

use crate::error::BrewError;
use crate::methods::CustomMethod;
use crate::recipe::BrewRecipe;

const TOKEN_VERSION: &str = "b1";
const COMPRESSION_LEVEL: u8 = 8;
/// Hard cap on incoming tokens; anything longer is garbage, not a link.
const MAX_TOKEN_LEN: usize = 4096;
/// Inflation ceiling for the decoded recipe JSON.
const MAX_RECIPE_BYTES: usize = 64 * 1024;

/// Encode a recipe as `b1.<base64url(deflate(json))>`.
pub fn encode_share_token(recipe: &BrewRecipe) -> Result<String, BrewError> {
    let json =
        serde_json::to_vec(recipe).map_err(|e| BrewError::InvalidToken(e.to_string()))?;
    let compressed = compress_to_vec(&json, COMPRESSION_LEVEL);
    Ok(format!(
        "{TOKEN_VERSION}.{}",
        URL_SAFE_NO_PAD.encode(compressed)
    ))
}

/// Decode a share token back into a validated recipe.
pub fn decode_share_token(token: &str) -> Result<BrewRecipe, BrewError> {
    if token.len() > MAX_TOKEN_LEN {
        return Err(BrewError::InvalidToken(
            "token exceeds max length".to_string(),
        ));
    }
    let (version, payload) = token
        .split_once('.')
        .ok_or_else(|| BrewError::InvalidToken("missing version prefix".to_string()))?;
    if version != TOKEN_VERSION {
        return Err(BrewError::InvalidToken(format!(
            "unsupported token version: {version}"
        )));
    }
    let compressed = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| BrewError::InvalidToken(e.to_string()))?;
    let json = decompress_to_vec_with_limit(&compressed, MAX_RECIPE_BYTES)
        .map_err(|e| BrewError::InvalidToken(e.to_string()))?;
    let json = String::from_utf8(json).map_err(|e| BrewError::InvalidToken(e.to_string()))?;
    BrewRecipe::from_json(&json)
}

/// Decode a shared link, falling back to the seed method when the token is
/// undecodable. The failure is logged, never surfaced as fatal.
pub fn decode_or_default(token: &str) -> CustomMethod {
    match decode_share_token(token).and_then(|r| CustomMethod::from_recipe(&r)) {
        Ok(method) => method,
        Err(e) => {
            warn!("ignoring undecodable share link: {e}");
            CustomMethod::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> BrewRecipe {
        let mut method = CustomMethod::default();
        method.title = "Shared V60".to_string();
        method.creator = "Okta".to_string();
        method.add_step();
        method.set_volume(1, 120.0).unwrap();
        method.set_label(1, "Main pour").unwrap();
        BrewRecipe::from(&method)
    }

    #[test]
    fn test_token_round_trip() {
        let recipe = sample_recipe();
        let token = encode_share_token(&recipe).unwrap();
        assert!(token.starts_with("b1."));
        let decoded = decode_share_token(&token).unwrap();
        assert_eq!(decoded, recipe);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = encode_share_token(&sample_recipe()).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let token = encode_share_token(&sample_recipe()).unwrap();
        let forged = format!("b9.{}", token.split_once('.').unwrap().1);
        assert!(matches!(
            decode_share_token(&forged),
            Err(BrewError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_garbage_tokens_are_rejected() {
        assert!(decode_share_token("").is_err());
        assert!(decode_share_token("no-version-prefix").is_err());
        assert!(decode_share_token("b1.!!!not-base64!!!").is_err());
        // valid base64 that does not inflate
        assert!(decode_share_token("b1.AAAA").is_err());
        let oversized = format!("b1.{}", "A".repeat(MAX_TOKEN_LEN));
        assert!(decode_share_token(&oversized).is_err());
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let token = encode_share_token(&sample_recipe()).unwrap();
        let truncated = &token[..token.len() - 6];
        assert!(decode_share_token(truncated).is_err());
    }

    #[test]
    fn test_decode_or_default_falls_back() {
        let method = decode_or_default("b1.definitely-not-a-recipe");
        assert_eq!(method, CustomMethod::default());

        let token = encode_share_token(&sample_recipe()).unwrap();
        let method = decode_or_default(&token);
        assert_eq!(method.title, "Shared V60");
        assert_eq!(method.schedule().len(), 2);
    }
}
