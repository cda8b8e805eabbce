use clap::Args;

use super::PathOpError;

/// Drop the cached listing of a directory and list it again.
///
/// Every run starts from an empty cache, so from the command line this
/// reports the same entries as `ls`; the reload matters to a long-lived
/// filesystem.
#[derive(Args, Debug, Clone)]
pub struct Flush {
    /// Directory to reload
    #[arg(default_value = "/")]
    pub path: String,
}

impl crate::op::Op for Flush {
    type Error = PathOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        if !fs.is_directory(&self.path)? {
            return Err(PathOpError::refused("flush", "reload", &self.path));
        }
        fs.flush(&self.path)?;
        let entries = fs.contents(&self.path)?.len();
        Ok(format!("Reloaded {} ({} entries)", self.path, entries))
    }
}
