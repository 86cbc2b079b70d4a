use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::error::SeedError;

/// A program plus its arguments, built up before it is handed to a `Runner`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// File name of the program without extension (`pg_ctl` for `bin/pg_ctl.exe`)
    pub fn name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Launches external programs
pub trait Runner {
    /// Run to completion and return stdout. A non-zero exit is a `Process` error.
    fn run(&self, invocation: &Invocation) -> Result<String, SeedError>;

    /// Run and report only whether it launched and exited with status 0
    fn probe(&self, invocation: &Invocation) -> bool;
}

/// `Runner` backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<String, SeedError> {
        log::debug!("running {}", invocation);
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map_err(|source| SeedError::Spawn {
                command: invocation.to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            log::debug!("{} stderr: {}", invocation.name(), stderr.trim());
        }

        if !output.status.success() {
            return Err(SeedError::Process {
                command: invocation.to_string(),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn probe(&self, invocation: &Invocation) -> bool {
        log::debug!("probing {}", invocation);
        Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;

    /// Lets a test keep a handle on a runner it boxed into an engine
    impl<R: Runner + ?Sized> Runner for Rc<R> {
        fn run(&self, invocation: &Invocation) -> Result<String, SeedError> {
            (**self).run(invocation)
        }

        fn probe(&self, invocation: &Invocation) -> bool {
            (**self).probe(invocation)
        }
    }

    /// Records invocations instead of launching them. `initdb` writes the
    /// version marker into its `-D` directory, like the real tool.
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: RefCell<Vec<Invocation>>,
        /// Program names that exit with status 1
        pub failing: Vec<&'static str>,
    }

    impl RecordingRunner {
        pub fn failing(names: &[&'static str]) -> Self {
            Self {
                failing: names.to_vec(),
                ..Default::default()
            }
        }

        pub fn names(&self) -> Vec<String> {
            self.calls.borrow().iter().map(Invocation::name).collect()
        }

        pub fn rendered(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|i| i.to_string()).collect()
        }
    }

    impl Runner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<String, SeedError> {
            self.calls.borrow_mut().push(invocation.clone());
            let name = invocation.name();
            if self.failing.contains(&name.as_str()) {
                return Err(SeedError::Process {
                    command: invocation.to_string(),
                    code: Some(1),
                });
            }
            if name == "initdb" {
                let data = invocation
                    .args
                    .iter()
                    .skip_while(|a| a.as_os_str() != "-D")
                    .nth(1)
                    .map(Path::new)
                    .unwrap();
                fs::write(data.join("PG_VERSION"), "16\n").unwrap();
            }
            Ok(String::new())
        }

        fn probe(&self, invocation: &Invocation) -> bool {
            self.calls.borrow_mut().push(invocation.clone());
            !self.failing.contains(&invocation.name().as_str())
        }
    }
}
