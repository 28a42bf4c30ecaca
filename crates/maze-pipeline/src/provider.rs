//! Cloud provider selection

use crate::error::{PipelineError, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Cloud provider targeted by the terraform files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Gcp];

    /// Name the operator types
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
        }
    }

    /// Terraform provider token the remote service expects
    pub fn normalized(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azurerm",
            Provider::Gcp => "google",
        }
    }

    /// Take `initial` if it names a provider, otherwise prompt on `output`
    /// and read lines from `input` until one does.
    ///
    /// Running out of input before a valid answer is a `ProviderInvalid` error.
    pub fn resolve<R, W>(initial: Option<&str>, input: &mut R, output: &mut W) -> Result<Provider>
    where
        R: BufRead,
        W: Write,
    {
        let mut last = String::new();

        if let Some(value) = initial {
            match value.parse() {
                Ok(provider) => return Ok(provider),
                Err(_) => {
                    tracing::debug!("Rejected provider from flag: {}", value);
                    writeln!(output, "Invalid provider '{}'", value)?;
                    last = value.to_string();
                }
            }
        }

        loop {
            write!(output, "Select a cloud provider (aws, azure, gcp): ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Err(PipelineError::ProviderInvalid(last));
            }

            let answer = line.trim();
            match answer.parse() {
                Ok(provider) => return Ok(provider),
                Err(_) => {
                    writeln!(
                        output,
                        "Invalid provider '{}'. Choose one of: aws, azure, gcp",
                        answer
                    )?;
                    last = answer.to_string();
                }
            }
        }
    }
}

impl FromStr for Provider {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| PipelineError::ProviderInvalid(value.to_string()))
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_normalization() {
        assert_eq!("aws".parse::<Provider>().unwrap().normalized(), "aws");
        assert_eq!("azure".parse::<Provider>().unwrap().normalized(), "azurerm");
        assert_eq!("gcp".parse::<Provider>().unwrap().normalized(), "google");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" GCP ".parse::<Provider>().unwrap(), Provider::Gcp);
        assert_eq!("Azure".parse::<Provider>().unwrap(), Provider::Azure);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for value in ["", "google", "azurerm", "digitalocean"] {
            assert!(matches!(
                value.parse::<Provider>(),
                Err(PipelineError::ProviderInvalid(_))
            ));
        }
    }

    #[test]
    fn test_resolve_from_flag_without_prompt() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        let provider = Provider::resolve(Some("aws"), &mut input, &mut output).unwrap();
        assert_eq!(provider, Provider::Aws);
        assert!(output.is_empty());
    }

    #[test]
    fn test_resolve_reprompts_until_valid() {
        let mut input = Cursor::new(b"ibm\n\nazure\n".to_vec());
        let mut output = Vec::new();

        let provider = Provider::resolve(Some("oracle"), &mut input, &mut output).unwrap();
        assert_eq!(provider, Provider::Azure);

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Invalid provider 'oracle'"));
        assert!(printed.contains("Invalid provider 'ibm'"));
        assert_eq!(printed.matches("Select a cloud provider").count(), 3);
    }

    #[test]
    fn test_resolve_prompts_when_missing() {
        let mut input = Cursor::new(b"gcp\n".to_vec());
        let mut output = Vec::new();

        let provider = Provider::resolve(None, &mut input, &mut output).unwrap();
        assert_eq!(provider, Provider::Gcp);
    }

    #[test]
    fn test_resolve_input_exhausted() {
        let mut input = Cursor::new(b"nope\n".to_vec());
        let mut output = Vec::new();

        let result = Provider::resolve(None, &mut input, &mut output);
        assert!(matches!(result, Err(PipelineError::ProviderInvalid(ref v)) if v == "nope"));
    }
}
