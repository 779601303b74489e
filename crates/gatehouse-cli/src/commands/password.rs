//! `gatehouse hash-password` - Hash a password read from stdin.
//!
//! Prints an Argon2id PHC string using the configured `[password]` cost, for
//! seeding credential rows by hand.

use anyhow::Context;
use gatehouse_core::PasswordConfig;
use gatehouse_issuer::PasswordHashing;
use std::io::BufRead;

pub async fn hash_password(cfg: &PasswordConfig, input: impl BufRead) -> anyhow::Result<String> {
    let password = read_password(input)?;
    let hashing = PasswordHashing::new(cfg)?;
    Ok(hashing.hash(password).await?)
}

/// First line of `input`, without the line terminator.
fn read_password(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("reading password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    anyhow::ensure!(!password.is_empty(), "password must not be empty");
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_password_strips_newline_only() {
        let pw = read_password(Cursor::new(" spaced pw \r\nsecond line")).unwrap();
        assert_eq!(pw, " spaced pw ");
    }

    #[test]
    fn test_read_password_rejects_empty() {
        assert!(read_password(Cursor::new("\n")).is_err());
        assert!(read_password(Cursor::new("")).is_err());
    }

    #[tokio::test]
    async fn test_hash_password() {
        let cfg = PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        let hash = hash_password(&cfg, Cursor::new("hunter2\n")).await.unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }
}
