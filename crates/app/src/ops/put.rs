use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use clap::Args;

use super::PathOpError;

#[derive(Args, Debug, Clone)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["file", "data"])))]
pub struct Put {
    /// Destination path
    pub path: String,

    /// Local file to upload
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Literal content to upload
    #[arg(long)]
    pub data: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PutError {
    #[error(transparent)]
    Path(#[from] PathOpError),
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

impl Put {
    fn content(&self) -> anyhow::Result<Bytes> {
        match (&self.file, &self.data) {
            (Some(file), _) => {
                let data = std::fs::read(file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                Ok(Bytes::from(data))
            }
            (None, Some(data)) => Ok(Bytes::from(data.clone())),
            (None, None) => anyhow::bail!("either --file or --data must be provided"),
        }
    }
}

impl crate::op::Op for Put {
    type Error = PutError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let content = self.content()?;
        let mut fs = ctx.open_fs().map_err(PathOpError::from)?;

        if !fs.can_write(&self.path).map_err(PathOpError::from)? {
            return Err(PathOpError::refused("put", "write", &self.path).into());
        }

        let size = content.len();
        fs.write(&self.path, content).map_err(PathOpError::from)?;
        Ok(format!("Wrote {} bytes to {}", size, self.path))
    }
}
