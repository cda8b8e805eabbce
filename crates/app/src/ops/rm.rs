use clap::Args;

use super::PathOpError;

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// File to delete
    pub path: String,
}

impl crate::op::Op for Rm {
    type Error = PathOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        if !fs.can_delete(&self.path)? {
            return Err(PathOpError::refused("rm", "delete", &self.path));
        }
        fs.delete(&self.path)?;
        Ok(format!("Deleted {}", self.path))
    }
}
