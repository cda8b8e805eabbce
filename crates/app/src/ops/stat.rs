use clap::Args;
use common::fs::FsError;

use super::PathOpError;

#[derive(Args, Debug, Clone)]
pub struct Stat {
    /// Path to describe
    #[arg(default_value = "/")]
    pub path: String,
}

impl crate::op::Op for Stat {
    type Error = PathOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        let id = fs
            .resolve(&self.path)?
            .ok_or_else(|| FsError::NotFound(self.path.clone()))?;

        let entry = fs
            .tree()
            .entry(id)
            .cloned()
            .ok_or_else(|| FsError::NotFound(self.path.clone()))?;
        let kind = if entry.is_directory() { "directory" } else { "file" };

        Ok(format!(
            "Path: {}\nType: {}\nSize: {} bytes\nBucket: {}\nKey: {}\nWritable: {}",
            self.path,
            kind,
            entry.size(),
            entry.bucket().unwrap_or("-"),
            entry.key().unwrap_or("-"),
            fs.can_write(&self.path)?,
        ))
    }
}
