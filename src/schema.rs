//! Request and response types shared by the pipeline and the HTTP layer.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// One uploaded document. `index` is its position in the request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub index: usize,
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(index: usize, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            index,
            name: name.into(),
            bytes,
        }
    }

    /// Hex SHA-256 of the file contents, for logs.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{:x}", hasher.finalize())
    }
}

/// The text an agent produced, tagged with who produced it from which files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    pub agent: String,
    pub file_indices: Vec<usize>,
    pub text: String,
}

/// Public view of a registry entry.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: &'static str,
    pub description: &'static str,
    pub required_files: usize,
    pub inputs: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest() {
        let file = UploadedFile::new(0, "a.pdf", b"abc".to_vec());
        assert_eq!(
            file.digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
