//! Password hashing and session tokens

use anyhow::{bail, Result};

use rand::Rng;
use rand_distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

const AUTH_TOKEN_LENGTH: usize = 64;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct AuthTokenValue(pub String);

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct AuthToken {
    pub user_id: usize,
    pub created: SystemTime,
    pub last_used: Option<SystemTime>,
    pub value: AuthTokenValue,
}

impl AuthTokenValue {
    pub fn generate() -> AuthTokenValue {
        let rng = rand::rng();
        let random_string: String = rng
            .sample_iter(&Alphanumeric)
            .take(AUTH_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        AuthTokenValue(random_string)
    }
}

mod moodwave_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{
            rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        },
        Argon2,
    };

    pub fn generate_b64_salt() -> String {
        SaltString::generate(&mut OsRng).to_string()
    }

    pub fn hash<T: AsRef<str>>(plain: &[u8], b64_salt: T) -> Result<String> {
        let argon2 = Argon2::default();
        let salt = SaltString::from_b64(b64_salt.as_ref()).map_err(|err| anyhow!("{}", err))?;
        let hash_string = argon2
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string();
        Ok(hash_string)
    }

    pub fn verify<T: AsRef<str>>(plain_pw: &[u8], target_hash: T) -> Result<bool> {
        let argon2 = Argon2::default();
        let password_hash =
            PasswordHash::new(target_hash.as_ref()).map_err(|err| anyhow!("{}", err))?;
        Ok(argon2.verify_password(plain_pw, &password_hash).is_ok())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum MoodwaveHasher {
    Argon2,
}

impl FromStr for MoodwaveHasher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(MoodwaveHasher::Argon2),
            _ => bail!("Unknown hasher {}", s),
        }
    }
}

impl fmt::Display for MoodwaveHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoodwaveHasher::Argon2 => f.write_str("argon2"),
        }
    }
}

impl MoodwaveHasher {
    pub fn generate_b64_salt(&self) -> String {
        match self {
            MoodwaveHasher::Argon2 => moodwave_argon2::generate_b64_salt(),
        }
    }

    pub fn hash<T: AsRef<str>>(&self, plain: &[u8], b64_salt: T) -> Result<String> {
        match self {
            MoodwaveHasher::Argon2 => moodwave_argon2::hash(plain, b64_salt),
        }
    }

    /// The argon2 hash string embeds its salt, so only the hash is needed.
    pub fn verify<T: AsRef<str>>(&self, plain_pw: T, target_hash: T) -> Result<bool> {
        match self {
            MoodwaveHasher::Argon2 => {
                moodwave_argon2::verify(plain_pw.as_ref().as_bytes(), target_hash)
            }
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct UsernamePasswordCredentials {
    pub user_id: usize,
    pub salt: String,
    pub hash: String,
    pub hasher: MoodwaveHasher,

    pub created: SystemTime,
    pub last_tried: Option<SystemTime>,
    pub last_used: Option<SystemTime>,
}

impl UsernamePasswordCredentials {
    pub fn new_hashed(user_id: usize, password: &str) -> Result<Self> {
        let hasher = MoodwaveHasher::Argon2;
        let salt = hasher.generate_b64_salt();
        let hash = hasher.hash(password.as_bytes(), &salt)?;
        Ok(UsernamePasswordCredentials {
            user_id,
            salt,
            hash,
            hasher,
            created: SystemTime::now(),
            last_tried: None,
            last_used: None,
        })
    }

    pub fn matches(&self, password: &str) -> Result<bool> {
        self.hasher.verify(password, self.hash.as_str())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct UserAuthCredentials {
    pub user_id: usize,
    pub username_password: Option<UsernamePasswordCredentials>,
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn argon2_hash() {
        let pw = "123mypw";
        let b64_salt = MoodwaveHasher::Argon2.generate_b64_salt();

        let hash1 = MoodwaveHasher::Argon2
            .hash(pw.as_bytes(), &b64_salt)
            .unwrap();
        let hash2 = MoodwaveHasher::Argon2
            .hash(b"123mypw", &b64_salt)
            .unwrap();
        assert_eq!(hash1, hash2);

        assert!(MoodwaveHasher::Argon2.verify("123mypw", hash1.as_str()).unwrap());
        assert!(!MoodwaveHasher::Argon2.verify("not the pw", hash1.as_str()).unwrap());
    }

    #[test]
    fn hasher_names_round_trip() {
        let name = MoodwaveHasher::Argon2.to_string();
        assert_eq!(name, "argon2");
        assert_eq!(
            MoodwaveHasher::from_str(&name).unwrap(),
            MoodwaveHasher::Argon2
        );
        assert!(MoodwaveHasher::from_str("bcrypt").is_err());
    }

    #[test]
    fn new_credentials_match_only_their_password() {
        let credentials = UsernamePasswordCredentials::new_hashed(7, "correct horse").unwrap();
        assert_eq!(credentials.user_id, 7);
        assert!(credentials.matches("correct horse").unwrap());
        assert!(!credentials.matches("battery staple").unwrap());
    }

    #[test]
    fn generated_tokens_are_alphanumeric_and_distinct() {
        let first = AuthTokenValue::generate();
        let second = AuthTokenValue::generate();
        assert_eq!(first.0.len(), AUTH_TOKEN_LENGTH);
        assert!(first.0.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
