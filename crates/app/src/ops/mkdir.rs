use clap::Args;

use super::PathOpError;

#[derive(Args, Debug, Clone)]
pub struct Mkdir {
    /// Directory to create
    pub path: String,
}

impl crate::op::Op for Mkdir {
    type Error = PathOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        if !fs.can_mkdir(&self.path)? {
            return Err(PathOpError::refused("mkdir", "create", &self.path));
        }
        fs.mkdir(&self.path)?;
        Ok(format!("Created directory {}", self.path))
    }
}
