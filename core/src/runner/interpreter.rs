use std::ffi::OsString;

use crate::config::InterpretersConfig;
use crate::resolver::{ScriptKind, ScriptRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub program: String,
    pub args: Vec<String>,
}

impl Interpreter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }
}

/// Fixed mapping from script kind to interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterTable {
    shell: Interpreter,
    interpreted: Interpreter,
}

impl Default for InterpreterTable {
    fn default() -> Self {
        Self::from_config(&InterpretersConfig::default())
    }
}

impl InterpreterTable {
    pub fn new(shell: Interpreter, interpreted: Interpreter) -> Self {
        Self { shell, interpreted }
    }

    pub fn from_config(cfg: &InterpretersConfig) -> Self {
        Self {
            shell: Interpreter {
                program: cfg.shell.clone(),
                args: cfg.shell_args.clone(),
            },
            interpreted: Interpreter {
                program: cfg.python.clone(),
                args: cfg.python_args.clone(),
            },
        }
    }

    pub fn get(&self, kind: ScriptKind) -> &Interpreter {
        match kind {
            ScriptKind::Shell => &self.shell,
            ScriptKind::Interpreted => &self.interpreted,
        }
    }

    /// Program and argument list for `script`; the script path is always last.
    pub fn command_line(&self, script: &ScriptRef) -> (String, Vec<OsString>) {
        let interpreter = self.get(script.kind());
        let mut args: Vec<OsString> = interpreter.args.iter().map(OsString::from).collect();
        args.push(script.path().as_os_str().to_os_string());
        (interpreter.program.clone(), args)
    }
}
