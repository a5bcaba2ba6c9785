//! `mault create` — encrypt and store a new secret.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::Session;
use crate::crypto::generate::{generate_password, DEFAULT_LENGTH};
use crate::errors::{MaultError, Result};
use crate::vault::{validate_secret_key, PasswordReader};

/// Where the secret's plaintext comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Masked interactive prompt (default).
    Prompt,
    /// Piped input (stdin is not a terminal).
    Stdin,
    /// Random password of the given length.
    Generate(usize),
}

impl ValueSource {
    /// Pick the source from the command-line flags and stdin.
    pub fn detect(generate: bool, length: Option<usize>) -> Self {
        if generate {
            Self::Generate(length.unwrap_or(DEFAULT_LENGTH))
        } else if !io::stdin().is_terminal() {
            Self::Stdin
        } else {
            Self::Prompt
        }
    }
}

/// Execute the `create` command.
pub fn execute<P>(session: &Session, reader: &P, key: &str, source: ValueSource) -> Result<()>
where
    P: PasswordReader + ?Sized,
{
    let ctx = session.context();
    let secrets = session.secrets();

    // Catch a bad name before asking for anything.
    validate_secret_key(key)?;

    let auth = session.authenticate(reader)?;

    // Fail early rather than after the value has been typed.
    if secrets.list(ctx)?.iter().any(|k| k == key) {
        return Err(MaultError::DuplicateKey(key.to_string()));
    }

    let value = match source {
        ValueSource::Prompt => reader.read_password(ctx, &format!("Enter value for {key}"))?,
        ValueSource::Stdin => read_piped_value()?,
        ValueSource::Generate(length) => {
            Zeroizing::new(generate_password(length)?.as_bytes().to_vec())
        }
    };

    if value.is_empty() {
        return Err(MaultError::CommandFailed(
            "secret value cannot be empty".into(),
        ));
    }

    secrets.seal(ctx, key, &value, auth.derived_key.as_slice())?;

    let details = matches!(source, ValueSource::Generate(_)).then_some("generated");
    session.audit("create", Some(key), details);

    output::success(&format!("Secret '{key}' created"));
    if details.is_some() {
        output::tip(&format!("Run `mault get {key}` to reveal it."));
    }

    Ok(())
}

/// Read all of stdin, dropping one trailing newline.
fn read_piped_value() -> Result<Zeroizing<Vec<u8>>> {
    let mut buf = Zeroizing::new(Vec::new());
    io::stdin().read_to_end(&mut buf)?;
    trim_line_ending(&mut buf);
    Ok(buf)
}

fn trim_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::context::Context;
    use crate::crypto::KdfParams;
    use crate::storage::Database;
    use crate::vault::ScriptedPasswordReader;

    const PASSWORD: &str = "Str0ng!Pass";

    fn session() -> Session {
        let s = Session::new(Context::new(), Database::open_in_memory().unwrap(), Settings::default())
            .with_kdf_params(KdfParams::minimum());
        s.master()
            .enroll_password(s.context(), PASSWORD.as_bytes())
            .unwrap();
        s
    }

    #[test]
    fn create_from_prompt_stores_encrypted_value() {
        let s = session();
        let reader = ScriptedPasswordReader::new([PASSWORD, "sk-123"]);
        execute(&s, &reader, "api", ValueSource::Prompt).unwrap();

        let record = s.secrets().get(s.context(), "api").unwrap();
        assert_ne!(record.cipher_text.as_slice(), b"sk-123");
        assert_eq!(record.cipher_text.len(), "sk-123".len() + 16);
    }

    #[test]
    fn create_generated_value_has_requested_length() {
        let s = session();
        let reader = ScriptedPasswordReader::new([PASSWORD]);
        execute(&s, &reader, "token", ValueSource::Generate(32)).unwrap();

        let record = s.secrets().get(s.context(), "token").unwrap();
        assert_eq!(record.cipher_text.len(), 32 + 16);
    }

    #[test]
    fn create_duplicate_fails_before_value_prompt() {
        let s = session();
        execute(
            &s,
            &ScriptedPasswordReader::new([PASSWORD, "one"]),
            "db-pass",
            ValueSource::Prompt,
        )
        .unwrap();

        let reader = ScriptedPasswordReader::new([PASSWORD, "two"]);
        assert!(matches!(
            execute(&s, &reader, "db-pass", ValueSource::Prompt),
            Err(MaultError::DuplicateKey(_))
        ));
        assert_eq!(reader.reads(), 1);
    }

    #[test]
    fn create_rejects_invalid_key_without_prompting() {
        let s = session();
        let reader = ScriptedPasswordReader::new([PASSWORD, "v"]);
        assert!(matches!(
            execute(&s, &reader, "list", ValueSource::Prompt),
            Err(MaultError::InvalidSecretKey(_))
        ));
        assert_eq!(reader.reads(), 0);
    }

    #[test]
    fn create_with_wrong_password_stores_nothing() {
        let s = session();
        let reader = ScriptedPasswordReader::new(["wrong", "v"]);
        assert!(matches!(
            execute(&s, &reader, "api", ValueSource::Prompt),
            Err(MaultError::AuthFailed)
        ));
        assert!(s.secrets().list(s.context()).unwrap().is_empty());
    }

    #[test]
    fn create_rejects_empty_value() {
        let s = session();
        let reader = ScriptedPasswordReader::new([PASSWORD, ""]);
        assert!(execute(&s, &reader, "api", ValueSource::Prompt).is_err());
        assert!(s.secrets().list(s.context()).unwrap().is_empty());
    }

    #[test]
    fn trims_one_line_ending() {
        let mut unix = b"value\n".to_vec();
        trim_line_ending(&mut unix);
        assert_eq!(unix, b"value");

        let mut windows = b"value\r\n".to_vec();
        trim_line_ending(&mut windows);
        assert_eq!(windows, b"value");

        let mut inner = b"a\nb\n\n".to_vec();
        trim_line_ending(&mut inner);
        assert_eq!(inner, b"a\nb\n");
    }

    #[test]
    fn generate_flag_wins_over_stdin() {
        assert_eq!(ValueSource::detect(true, None), ValueSource::Generate(20));
        assert_eq!(ValueSource::detect(true, Some(40)), ValueSource::Generate(40));
    }
}
