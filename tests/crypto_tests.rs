//! Integration tests for the Mault crypto module.

use mault::crypto::{
    check_strength, decrypt, derive_key_with_params, encrypt, generate_password, generate_salt,
    KdfParams, PasswordRule, SALT_LEN,
};
use mault::errors::MaultError;

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; 32];
    let plaintexts: [&[u8]; 4] = [b"", b"sk-123", b"postgres://user:pw@localhost/db", &[0u8; 4096]];

    for plaintext in plaintexts {
        let sealed = encrypt(plaintext, &key).expect("encrypt should succeed");
        assert_eq!(sealed.nonce.len(), 12);
        assert_eq!(sealed.cipher_text.len(), plaintext.len() + 16);

        let recovered = decrypt(&sealed.nonce, &sealed.cipher_text, &key).expect("decrypt");
        assert_eq!(recovered.as_slice(), plaintext);
    }
}

#[test]
fn encrypt_uses_fresh_nonce_each_time() {
    let key = [0xCDu8; 32];
    let a = encrypt(b"SECRET=hello", &key).unwrap();
    let b = encrypt(b"SECRET=hello", &key).unwrap();
    assert_ne!(a.nonce, b.nonce);
    assert_ne!(a.cipher_text, b.cipher_text);
}

// ---------------------------------------------------------------------------
// Fail-closed decryption
// ---------------------------------------------------------------------------

#[test]
fn wrong_key_fails_with_opaque_cipher_error() {
    let sealed = encrypt(b"sk-123", &[1u8; 32]).unwrap();
    let err = decrypt(&sealed.nonce, &sealed.cipher_text, &[2u8; 32]).unwrap_err();
    assert!(matches!(err, MaultError::Cipher));
}

#[test]
fn tampering_and_truncation_look_like_a_wrong_key() {
    let key = [7u8; 32];
    let sealed = encrypt(b"sk-123", &key).unwrap();

    let mut flipped = sealed.cipher_text.clone();
    flipped[0] ^= 0x01;
    let truncated = &sealed.cipher_text[..sealed.cipher_text.len() - 1];

    let wrong_key = decrypt(&sealed.nonce, &sealed.cipher_text, &[8u8; 32]).unwrap_err();
    let tampered = decrypt(&sealed.nonce, &flipped, &key).unwrap_err();
    let short = decrypt(&sealed.nonce, truncated, &key).unwrap_err();
    let bad_nonce = decrypt(&sealed.nonce[..11], &sealed.cipher_text, &key).unwrap_err();

    let shown = wrong_key.to_string();
    assert_eq!(tampered.to_string(), shown);
    assert_eq!(short.to_string(), shown);
    assert_eq!(bad_nonce.to_string(), shown);
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derivation_is_deterministic_and_salt_sensitive() {
    let params = KdfParams::minimum();
    let salt_a = generate_salt(SALT_LEN);
    let salt_b = generate_salt(SALT_LEN);
    assert_eq!(salt_a.len(), 16);
    assert_ne!(salt_a, salt_b);

    let k1 = derive_key_with_params(b"Str0ng!Pass", &salt_a, &params).unwrap();
    let k2 = derive_key_with_params(b"Str0ng!Pass", &salt_a, &params).unwrap();
    let k3 = derive_key_with_params(b"Str0ng!Pass", &salt_b, &params).unwrap();

    assert_eq!(*k1, *k2);
    assert_ne!(*k1, *k3);
}

#[test]
fn derived_key_opens_what_it_sealed() {
    let params = KdfParams::minimum();
    let salt = generate_salt(SALT_LEN);
    let key = derive_key_with_params(b"Str0ng!Pass", &salt, &params).unwrap();
    let other = derive_key_with_params(b"wrong", &salt, &params).unwrap();

    let sealed = encrypt(b"sk-123", key.as_slice()).unwrap();
    assert!(decrypt(&sealed.nonce, &sealed.cipher_text, other.as_slice()).is_err());
    assert_eq!(
        decrypt(&sealed.nonce, &sealed.cipher_text, key.as_slice())
            .unwrap()
            .as_slice(),
        b"sk-123"
    );
}

// ---------------------------------------------------------------------------
// Password policy and generator
// ---------------------------------------------------------------------------

#[test]
fn weak_passwords_are_rejected_with_reasons() {
    let short = check_strength(b"abc").unwrap_err();
    assert_eq!(short.first(), PasswordRule::MinLength);

    let lowercase = check_strength(b"abcdefgh").unwrap_err();
    assert!(lowercase.violates(PasswordRule::Uppercase));
    assert!(lowercase.violates(PasswordRule::Digit));
    assert!(lowercase.violates(PasswordRule::Special));
    assert!(!lowercase.violates(PasswordRule::MinLength));

    assert!(check_strength(b"Str0ng!Pass").is_ok());
}

#[test]
fn generated_passwords_use_the_generator_charset() {
    let password = generate_password(64).unwrap();
    assert_eq!(password.len(), 64);
    assert!(password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#%&*-_?".contains(c)));
    assert!(generate_password(4).is_err());
}
