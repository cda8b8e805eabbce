use clap::Args;

use super::PathOpError;

#[derive(Args, Debug, Clone)]
pub struct Touch {
    /// Directory to refresh, or file to create if missing
    pub path: String,
}

impl crate::op::Op for Touch {
    type Error = PathOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        let exists = fs.resolve(&self.path)?.is_some();
        if !exists && !fs.can_write(&self.path)? {
            return Err(PathOpError::refused("touch", "create", &self.path));
        }
        fs.touch(&self.path)?;
        if exists {
            Ok(format!("Touched {}", self.path))
        } else {
            Ok(format!("Created empty file {}", self.path))
        }
    }
}
