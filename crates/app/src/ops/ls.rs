use clap::Args;

use super::{child_path, PathOpError};

#[derive(Args, Debug, Clone)]
pub struct Ls {
    /// Directory to list
    #[arg(default_value = "/")]
    pub path: String,

    /// Show kind and size for each entry
    #[arg(long, short)]
    pub long: bool,
}

impl crate::op::Op for Ls {
    type Error = PathOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        let names = fs.contents(&self.path)?;

        if !self.long {
            return Ok(names.join("\n"));
        }

        let mut lines = Vec::with_capacity(names.len());
        for name in names {
            let path = child_path(&self.path, &name);
            if fs.is_directory(&path)? {
                lines.push(format!("d {:>12} {}/", "-", name));
            } else {
                lines.push(format!("- {:>12} {}", fs.size(&path)?, name));
            }
        }
        Ok(lines.join("\n"))
    }
}
