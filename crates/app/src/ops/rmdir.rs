use clap::Args;

use super::PathOpError;

#[derive(Args, Debug, Clone)]
pub struct Rmdir {
    /// Empty directory to remove
    pub path: String,
}

impl crate::op::Op for Rmdir {
    type Error = PathOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        if !fs.can_rmdir(&self.path)? {
            return Err(PathOpError::refused("rmdir", "remove", &self.path));
        }
        fs.rmdir(&self.path)?;
        Ok(format!("Removed directory {}", self.path))
    }
}
