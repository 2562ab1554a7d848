use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files: u64,
    pub chunks: u64,
    pub bytes: u64,
    pub failures: u64,
    pub elapsed_ms: u64,
}

impl RunStats {
    pub fn summary(&self) -> String {
        format!(
            "{} chunks ({} bytes) from {} files in {} ms, {} failed",
            self.chunks, self.bytes, self.files, self.elapsed_ms, self.failures
        )
    }
}
