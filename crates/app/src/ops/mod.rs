pub mod cat;
pub mod flush;
pub mod init;
pub mod ls;
pub mod mkdir;
pub mod put;
pub mod rm;
pub mod rmdir;
pub mod stat;
pub mod touch;
pub mod version;

pub use cat::Cat;
pub use flush::Flush;
pub use init::Init;
pub use ls::Ls;
pub use mkdir::Mkdir;
pub use put::Put;
pub use rm::Rm;
pub use rmdir::Rmdir;
pub use stat::Stat;
pub use touch::Touch;
pub use version::Version;

use common::fs::FsError;

use crate::op::ContextError;

/// Failure shared by the commands that act on a single path.
#[derive(Debug, thiserror::Error)]
pub enum PathOpError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error("{op}: cannot {action} {path}")]
    Refused {
        op: &'static str,
        action: &'static str,
        path: String,
    },
}

impl PathOpError {
    pub fn refused(op: &'static str, action: &'static str, path: &str) -> Self {
        PathOpError::Refused {
            op,
            action,
            path: path.to_string(),
        }
    }
}

/// Absolute path of `name` inside the directory at `dir`.
pub fn child_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::op::{Op, OpContext};

    fn initialized(bucket: Option<&str>) -> (OpContext, TempDir) {
        let temp = TempDir::new().unwrap();
        let ctx = OpContext::new(
            Some(temp.path().to_path_buf()),
            bucket.map(str::to_string),
        );
        let init = Init {
            local_path: None,
            s3_bucket: Vec::new(),
            s3_endpoint: None,
            s3_region: None,
            page_limit: 2,
            log_level: "info".to_string(),
            log_dir: None,
        };
        init.execute(&ctx).unwrap();
        (ctx, temp)
    }

    fn put(ctx: &OpContext, path: &str, data: &str) {
        Put {
            path: path.to_string(),
            file: None,
            data: Some(data.to_string()),
        }
        .execute(ctx)
        .unwrap();
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("/", "a"), "/a");
        assert_eq!(child_path("/docs", "a.txt"), "/docs/a.txt");
        assert_eq!(child_path("/docs/", "a.txt"), "/docs/a.txt");
    }

    #[test]
    fn test_bucket_round_trip() {
        let (ctx, _temp) = initialized(None);

        Mkdir {
            path: "/photos".to_string(),
        }
        .execute(&ctx)
        .unwrap();
        put(&ctx, "/photos/cat.txt", "meow");
        put(&ctx, "/photos/dog.txt", "woof");

        let listing = Ls {
            path: "/photos".to_string(),
            long: false,
        }
        .execute(&ctx)
        .unwrap();
        assert_eq!(listing, "cat.txt\ndog.txt");

        let body = Cat {
            path: "/photos/cat.txt".to_string(),
        }
        .execute(&ctx)
        .unwrap();
        assert_eq!(body, "meow");

        Rm {
            path: "/photos/cat.txt".to_string(),
        }
        .execute(&ctx)
        .unwrap();
        let listing = Ls {
            path: "/photos".to_string(),
            long: true,
        }
        .execute(&ctx)
        .unwrap();
        assert!(listing.contains("dog.txt"));
        assert!(!listing.contains("cat.txt"));
    }

    #[test]
    fn test_refusals() {
        let (ctx, _temp) = initialized(None);

        // no files directly under the bucket list
        let result = Put {
            path: "/loose.txt".to_string(),
            file: None,
            data: Some("x".to_string()),
        }
        .execute(&ctx);
        assert!(matches!(
            result,
            Err(put::PutError::Path(PathOpError::Refused { .. }))
        ));

        let result = Rmdir {
            path: "/".to_string(),
        }
        .execute(&ctx);
        assert!(matches!(result, Err(PathOpError::Refused { .. })));

        let result = Rm {
            path: "/missing".to_string(),
        }
        .execute(&ctx);
        assert!(matches!(result, Err(PathOpError::Refused { .. })));

        let result = Flush {
            path: "/missing".to_string(),
        }
        .execute(&ctx);
        assert!(matches!(result, Err(PathOpError::Refused { .. })));
    }

    #[test]
    fn test_flush_reports_entries() {
        let (ctx, _temp) = initialized(None);
        Mkdir {
            path: "/photos".to_string(),
        }
        .execute(&ctx)
        .unwrap();
        put(&ctx, "/photos/cat.txt", "meow");
        put(&ctx, "/photos/dog.txt", "woof");
        put(&ctx, "/photos/emu.txt", "honk");

        let report = Flush {
            path: "/photos".to_string(),
        }
        .execute(&ctx)
        .unwrap();
        assert_eq!(report, "Reloaded /photos (3 entries)");
    }

    #[test]
    fn test_single_bucket_root() {
        let (ctx, temp) = initialized(None);
        Mkdir {
            path: "/docs".to_string(),
        }
        .execute(&ctx)
        .unwrap();

        let docs = OpContext::new(Some(temp.path().to_path_buf()), Some("docs".to_string()));
        Mkdir {
            path: "/notes".to_string(),
        }
        .execute(&docs)
        .unwrap();
        put(&docs, "/notes/a.txt", "a");
        put(&docs, "/b.txt", "b");

        let listing = Ls {
            path: "/".to_string(),
            long: false,
        }
        .execute(&docs)
        .unwrap();
        assert_eq!(listing, "b.txt\nnotes");

        let stat = Stat {
            path: "/notes/a.txt".to_string(),
        }
        .execute(&docs)
        .unwrap();
        assert!(stat.contains("Type: file"));
        assert!(stat.contains("Key: notes/a.txt"));
    }
}
