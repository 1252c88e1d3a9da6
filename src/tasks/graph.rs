// src/tasks/graph.rs

use std::collections::HashMap;
use std::fmt;

use anyhow::{anyhow, Result};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

/// Names of the build entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskName {
    Compile,
    Serve,
    Watch,
    Dev,
    Build,
}

impl TaskName {
    pub const ALL: [TaskName; 5] = [
        TaskName::Dev,
        TaskName::Build,
        TaskName::Compile,
        TaskName::Watch,
        TaskName::Serve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::Compile => "compile",
            TaskName::Serve => "serve",
            TaskName::Watch => "watch",
            TaskName::Dev => "dev",
            TaskName::Build => "build",
        }
    }

    /// Tasks that leave a server or watch subscriptions behind; the process
    /// stays alive in the runtime loop after the task itself completes.
    pub fn keeps_process_alive(&self) -> bool {
        matches!(self, TaskName::Dev | TaskName::Watch | TaskName::Serve)
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf units of work behind the named tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Run the transform pipeline over all matched sources once.
    Compile,
    /// Bind the dev server and start serving in the background.
    Serve,
    /// Arm watch subscriptions and return immediately.
    Watch,
}

/// How a named task is built.
#[derive(Debug, Clone)]
pub enum TaskSpec {
    Action(ActionKind),
    /// Ordered: each child waits for its predecessor to complete.
    Series(Vec<TaskName>),
    /// Unordered: children run concurrently; all must complete.
    Parallel(Vec<TaskName>),
}

/// Explicit task registry: a data structure interpreted by the runner,
/// rather than control flow hidden in callbacks.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    specs: HashMap<TaskName, TaskSpec>,
}

impl TaskGraph {
    /// The built-in registry:
    ///
    /// - `compile` — run the pipeline once
    /// - `serve`   — static server + reload channel
    /// - `watch`   — arm subscriptions
    /// - `dev`     — series: compile, serve, watch (the default)
    /// - `build`   — series: compile (one-shot production build)
    pub fn builtin() -> Self {
        let mut specs = HashMap::new();
        specs.insert(TaskName::Compile, TaskSpec::Action(ActionKind::Compile));
        specs.insert(TaskName::Serve, TaskSpec::Action(ActionKind::Serve));
        specs.insert(TaskName::Watch, TaskSpec::Action(ActionKind::Watch));
        specs.insert(
            TaskName::Dev,
            TaskSpec::Series(vec![TaskName::Compile, TaskName::Serve, TaskName::Watch]),
        );
        specs.insert(TaskName::Build, TaskSpec::Series(vec![TaskName::Compile]));
        Self { specs }
    }

    /// Replace or add one task spec. Re-validate afterwards.
    pub fn with_spec(mut self, name: TaskName, spec: TaskSpec) -> Self {
        self.specs.insert(name, spec);
        self
    }

    pub fn spec(&self, name: TaskName) -> Option<&TaskSpec> {
        self.specs.get(&name)
    }

    /// Check that composed tasks form a DAG.
    ///
    /// A topological sort fails if a composition (directly or transitively)
    /// contains itself.
    pub fn validate(&self) -> Result<()> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in self.specs.keys() {
            graph.add_node(name.as_str());
        }

        for (name, spec) in &self.specs {
            let children: &[TaskName] = match spec {
                TaskSpec::Action(_) => &[],
                TaskSpec::Series(children) | TaskSpec::Parallel(children) => children,
            };

            for child in children {
                if child == name {
                    return Err(anyhow!("task '{name}' cannot contain itself"));
                }
                graph.add_edge(name.as_str(), child.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(anyhow!(
                "cycle detected in task graph involving task '{}'",
                cycle.node_id()
            )),
        }
    }
}
