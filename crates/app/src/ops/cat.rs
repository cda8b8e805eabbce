use clap::Args;

use super::PathOpError;

#[derive(Args, Debug, Clone)]
pub struct Cat {
    /// File to read
    pub path: String,
}

impl crate::op::Op for Cat {
    type Error = PathOpError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        if !fs.is_file(&self.path)? {
            return Err(PathOpError::refused("cat", "read", &self.path));
        }
        let bytes = fs.read(&self.path)?;

        // Text as-is, binary as hex
        match std::str::from_utf8(&bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => Ok(bytes
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ")),
        }
    }
}
