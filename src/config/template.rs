//! Sample configuration file generation (`mpesa-cli config init`).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::config::loader::ConfigError;

pub const TEMPLATE: &str = r#"# M-Pesa CLI Configuration File
# Copy this file to ~/.config/mpesa-cli/mpesa-cli.yaml and customize

# Your M-Pesa environment: "sandbox" or "production"
environment: sandbox

# Your business shortcode (required for production)
# business_shortcode: "123456"

# Your security credential (required for production)
# security_credential: "your-encrypted-credential"

# API initiator name (optional, defaults to "testapi")
# initiator: "your-initiator-name"

# Callback URLs for transaction results (optional)
# result_url: "https://yourdomain.com/mpesa/result"
# queue_timeout_url: "https://yourdomain.com/mpesa/timeout"

# Override the API host, e.g. for a gateway (optional)
# base_url: "https://sandbox.safaricom.co.ke"

# HTTP timeout in seconds (optional, defaults to 10)
# timeout_secs: 10
"#;

/// Write the sample config to `path`. Never overwrites an existing file.
pub fn write_template(path: &Path) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(io_error)?;
    file.write_all(TEMPLATE.as_bytes()).map_err(io_error)?;

    tracing::info!(path = %path.display(), "Config template written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::load_file;

    #[test]
    fn test_template_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mpesa-cli.yaml");
        write_template(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("environment: sandbox"));
        assert!(content.contains("# business_shortcode:"));
        assert!(content.contains("# security_credential:"));
    }

    #[test]
    fn test_template_parses_as_sandbox() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mpesa-cli.yaml");
        write_template(&path).unwrap();

        let settings = load_file(&path).unwrap();
        assert_eq!(settings.environment.as_deref(), Some("sandbox"));
        assert_eq!(settings.business_shortcode, None);
    }

    #[test]
    fn test_template_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mpesa-cli.yaml");
        std::fs::write(&path, "initiator: mine\n").unwrap();

        let err = write_template(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "initiator: mine\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_template_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mpesa-cli.yaml");
        write_template(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
