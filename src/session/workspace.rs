use crate::namespace::{AttachError, Namespace, NodeId};

/// State of one interactive session: the namespace tree plus the current
/// directory. Lives exactly as long as the session that owns it.
#[derive(Debug, Clone)]
pub struct Workspace {
    namespace: Namespace,
    cwd: NodeId,
}

impl Workspace {
    /// Builds the fixed startup tree, `/home/user` holding three text files,
    /// and places the session in `/home/user`.
    pub fn bootstrap() -> Result<Self, AttachError> {
        let mut namespace = Namespace::new();
        let home = namespace.add_directory(namespace.root(), "home")?;
        let user = namespace.add_directory(home, "user")?;
        for index in 1..=3 {
            namespace.add_file(
                user,
                format!("text{index}.txt"),
                format!("Содержимое файла text{index}.txt"),
            )?;
        }
        Ok(Workspace {
            namespace,
            cwd: user,
        })
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The current directory. Always a directory node.
    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    /// Moves the session to another directory. No command drives this yet,
    /// but resolution and the prompt already follow it.
    pub fn set_cwd(&mut self, cwd: NodeId) {
        self.cwd = cwd;
    }

    /// Absolute path of the current directory, as shown in the prompt and
    /// reported by `pwd`.
    pub fn working_path(&self) -> String {
        self.namespace.full_path(self.cwd)
    }
}
