//! Analyzer command-line assembly.

use std::fmt;
use std::path::Path;

use tidyscan_config::ResolvedConfig;

/// Program and ordered arguments for one analyzer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    /// Arguments for analyzing `document_path` as `language_id`.
    ///
    /// Order: the document path, the configuration's base arguments, then the
    /// dialect and standard flags when a standard is known for the language.
    #[must_use]
    pub fn build(config: &ResolvedConfig, document_path: &Path, language_id: &str) -> Self {
        let mut args = Vec::with_capacity(config.base_args().len() + 3);
        args.push(document_path.to_string_lossy().into_owned());
        args.extend(config.base_args().iter().cloned());
        args.extend(dialect_args(config, language_id));
        Self {
            program: config.executable().to_string(),
            args,
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn dialect_args(config: &ResolvedConfig, language_id: &str) -> Vec<String> {
    let (dialect, standard) = match language_id {
        "c" => ("c", config.c_standard()),
        "cpp" => ("c++", config.cpp_standard()),
        _ => return Vec::new(),
    };
    let Some(standard) = standard else {
        return Vec::new();
    };
    vec![
        format!("-extra-arg-before=-x{dialect}"),
        format!("-extra-arg-before=-std={standard}"),
    ]
}
