//! Token management commands.
//!
//! `gatehouse token mint` - Sign a token for an arbitrary identity.
//! `gatehouse token verify` - Verify a token and print its identity.
//! `gatehouse token inspect` - Print a token's claims without verifying it.
//!
//! All of them read the signing secret the same way the services do.

use anyhow::Context;
use gatehouse_core::{Identity, Role, TokenConfig, UserId};
use gatehouse_token::{
    IssuedToken, SigningKey, TokenInfo, TokenIssuer, TokenVerifier, inspect_token_unverified,
};
use std::fs;
use std::path::Path;

/// Accept either a token or a path to a file holding one.
fn load_token(token: String) -> anyhow::Result<String> {
    let path = Path::new(&token);
    if path.is_file() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read token file: {}", path.display()))?;
        return Ok(contents.trim().to_string());
    }
    Ok(token.trim().to_string())
}

/// Mint a token for `sub`/`user_id`/`role`.
pub fn mint(
    cfg: &TokenConfig,
    sub: String,
    user_id: UserId,
    role: Role,
    ttl: Option<String>,
) -> anyhow::Result<IssuedToken> {
    let key = SigningKey::from_config(cfg).context("loading token signing secret")?;
    let ttl = match ttl {
        Some(raw) => humantime::parse_duration(&raw)
            .with_context(|| format!("invalid --ttl {raw:?}"))?,
        None => cfg.ttl()?,
    };

    let issued = TokenIssuer::new(key, ttl).issue(&Identity::new(sub, user_id, role))?;
    Ok(issued)
}

/// Verify a token with the configured secret.
pub fn verify(cfg: &TokenConfig, token: String) -> anyhow::Result<Identity> {
    let key = SigningKey::from_config(cfg).context("loading token signing secret")?;
    let token = load_token(token)?;
    let identity = TokenVerifier::new(key, cfg.leeway_secs)
        .verify(&token)
        .context("Token verification failed")?;
    Ok(identity)
}

/// Decode a token without verifying it.
pub fn inspect(token: String) -> anyhow::Result<TokenInfo> {
    let token = load_token(token)?;
    Ok(inspect_token_unverified(&token)?)
}

pub fn print_identity(identity: &Identity) {
    println!("✔ Token is valid");
    println!();
    println!("Token Details:");
    println!("  Subject: {}", identity.subject);
    println!("  User id: {}", identity.user_id);
    println!("  Role: {}", identity.role);
}

pub fn print_info(info: &TokenInfo) -> anyhow::Result<()> {
    println!("Token Information (signature NOT verified):");
    println!("  Algorithm: {}", info.algorithm);
    println!();
    println!("{}", serde_json::to_string_pretty(&info.claims)?);
    Ok(())
}
