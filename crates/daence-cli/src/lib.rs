//! Daence file sealing.
//!
//! Whole-file seal, open and key generation on top of [`daence_crypto`].
//! Keys are raw bytes on disk (64 for ChaCha-Daence, 96 for Salsa20-Daence);
//! sealed files are `tag (24 bytes) || ciphertext`.
//!
//! # Failure handling
//!
//! Every input is read and the whole operation runs in memory before the
//! output path is touched, so a forged or truncated sealed file never
//! produces an output file. [`CliError::exit_code`] maps such rejections
//! to status 2 and everything else to status 1.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use daence_crypto::{ChaChaDaence, DaenceError, DeterministicAead, Salsa20Daence};
pub use error::CliError;
use zeroize::Zeroizing;

/// Daence instantiation selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Construction {
    /// ChaCha-Daence, 64-byte key
    #[default]
    Chacha,
    /// Salsa20-Daence, 96-byte key
    Salsa20,
}

impl Construction {
    /// Key length in bytes for this construction.
    pub fn key_size(self) -> usize {
        match self {
            Self::Chacha => ChaChaDaence::KEY_SIZE,
            Self::Salsa20 => Salsa20Daence::KEY_SIZE,
        }
    }

    /// Build a cipher from raw key bytes.
    pub fn cipher(self, key: &[u8]) -> Result<Cipher, DaenceError> {
        Ok(match self {
            Self::Chacha => Cipher::ChaCha(ChaChaDaence::new(key)?),
            Self::Salsa20 => Cipher::Salsa20(Salsa20Daence::new(key)?),
        })
    }
}

/// Either construction, chosen at runtime.
#[derive(Debug, Clone)]
pub enum Cipher {
    /// ChaCha-Daence
    ChaCha(ChaChaDaence),
    /// Salsa20-Daence
    Salsa20(Salsa20Daence),
}

impl Cipher {
    /// Seal `message` under `associated_data`.
    pub fn seal(&self, message: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaenceError> {
        match self {
            Self::ChaCha(cipher) => cipher.seal(message, associated_data),
            Self::Salsa20(cipher) => cipher.seal(message, associated_data),
        }
    }

    /// Open `sealed` under `associated_data`.
    pub fn open(&self, sealed: &[u8], associated_data: &[u8]) -> Result<Vec<u8>, DaenceError> {
        match self {
            Self::ChaCha(cipher) => cipher.open(sealed, associated_data),
            Self::Salsa20(cipher) => cipher.open(sealed, associated_data),
        }
    }
}

/// Files involved in one seal or open run.
#[derive(Debug, Clone)]
pub struct FileJob {
    /// Construction the key belongs to
    pub construction: Construction,
    /// Raw key file
    pub key: PathBuf,
    /// Associated data file; empty associated data when absent
    pub associated_data: Option<PathBuf>,
    /// File to seal or open
    pub input: PathBuf,
    /// Destination, written only on success
    pub output: PathBuf,
}

impl FileJob {
    /// Seal `input` into `output`. Returns the number of bytes written.
    pub fn seal(&self) -> Result<usize, CliError> {
        let (cipher, associated_data) = self.load_context()?;
        let message = Zeroizing::new(read(&self.input)?);

        let sealed = cipher.seal(&message, &associated_data)?;
        write(&self.output, &sealed)?;

        tracing::info!(input = %self.input.display(), bytes = sealed.len(), "sealed");
        Ok(sealed.len())
    }

    /// Open `input` into `output`. Returns the number of bytes written.
    ///
    /// Nothing is written when the sealed input is rejected.
    pub fn open(&self) -> Result<usize, CliError> {
        let (cipher, associated_data) = self.load_context()?;
        let sealed = read(&self.input)?;

        let message = Zeroizing::new(cipher.open(&sealed, &associated_data).inspect_err(|err| {
            tracing::warn!(input = %self.input.display(), %err, "rejected sealed input");
        })?);
        write(&self.output, &message)?;

        tracing::info!(input = %self.input.display(), bytes = message.len(), "opened");
        Ok(message.len())
    }

    fn load_context(&self) -> Result<(Cipher, Vec<u8>), CliError> {
        let key = Zeroizing::new(read(&self.key)?);
        let cipher = self
            .construction
            .cipher(&key)
            .map_err(|source| CliError::Key { path: self.key.clone(), source })?;

        let associated_data = match &self.associated_data {
            Some(path) => read(path)?,
            None => Vec::new(),
        };
        Ok((cipher, associated_data))
    }
}

/// Write a fresh random key for `construction` to `output`.
///
/// Refuses to overwrite an existing file. On Unix the file is created with
/// mode 0600.
pub fn generate_key(construction: Construction, output: &Path) -> Result<(), CliError> {
    let mut key = Zeroizing::new(vec![0u8; construction.key_size()]);
    getrandom::fill(key.as_mut_slice()).map_err(CliError::Random)?;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
        .open(output)
        .and_then(|mut file| file.write_all(&key))
        .map_err(|source| CliError::Write { path: output.to_path_buf(), source })?;

    tracing::info!(output = %output.display(), ?construction, "generated key");
    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::Write { path: path.to_path_buf(), source })
}
