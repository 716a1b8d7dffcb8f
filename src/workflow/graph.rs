// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Job dependency graph
//!
//! Built from the `needs` lists of a pipeline. flowsmith never schedules
//! jobs itself; the graph exists to reject unknown dependencies and cycles
//! before a workflow is written, and to visualise the declared edges.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

use crate::errors::FlowError;
use crate::workflow::Pipeline;

/// Dependency graph over job keys
pub struct JobGraph {
    graph: DiGraph<String, ()>,
    key_to_index: HashMap<String, NodeIndex>,
    /// Job keys in pipeline order
    keys: Vec<String>,
    /// Each job's `needs`, as declared
    needs: HashMap<String, Vec<String>>,
}

impl JobGraph {
    /// Build the graph for a pipeline
    pub fn build(pipeline: &Pipeline) -> Result<Self, FlowError> {
        let mut graph = DiGraph::new();
        let mut key_to_index = HashMap::new();
        let mut needs = HashMap::new();

        for key in pipeline.jobs.keys() {
            let node = graph.add_node(key.clone());
            key_to_index.insert(key.clone(), node);
        }

        for (key, job) in &pipeline.jobs {
            let job_node = key_to_index[key];

            for dependency in &job.needs {
                let dep_node = key_to_index.get(dependency).ok_or_else(|| {
                    FlowError::UnknownDependency {
                        job: key.clone(),
                        dependency: dependency.clone(),
                    }
                })?;

                if !graph.contains_edge(*dep_node, job_node) {
                    graph.add_edge(*dep_node, job_node, ());
                }
            }

            let mut declared: Vec<String> = Vec::with_capacity(job.needs.len());
            for dependency in &job.needs {
                if !declared.contains(dependency) {
                    declared.push(dependency.clone());
                }
            }
            needs.insert(key.clone(), declared);
        }

        let built = Self {
            graph,
            key_to_index,
            keys: pipeline.jobs.keys().cloned().collect(),
            needs,
        };
        built.validate_acyclic()?;

        Ok(built)
    }

    fn validate_acyclic(&self) -> Result<(), FlowError> {
        toposort(&self.graph, None)
            .map(|_| ())
            .map_err(|cycle| FlowError::CircularDependency {
                jobs: self.find_cycle(cycle.node_id()),
            })
    }

    /// Walk back along incoming edges from `start` until a node repeats
    fn find_cycle(&self, start: NodeIndex) -> Vec<String> {
        let mut path = vec![start];
        let mut current = start;

        loop {
            let next = self
                .graph
                .neighbors_directed(current, Direction::Incoming)
                .find(|n| petgraph::algo::has_path_connecting(&self.graph, start, *n, None));

            let Some(next) = next else {
                break;
            };

            if let Some(pos) = path.iter().position(|n| *n == next) {
                let mut cycle = vec![self.graph[next].clone()];
                cycle.extend(path[pos..].iter().rev().map(|n| self.graph[*n].clone()));
                return cycle;
            }

            path.push(next);
            current = next;
        }

        vec![self.graph[start].clone()]
    }

    /// Job keys in an order that satisfies every `needs` edge
    ///
    /// Ties are broken by pipeline order so the result is stable.
    pub fn topological_order(&self) -> Vec<String> {
        let mut remaining: Vec<&String> = self.keys.iter().collect();
        let mut done: Vec<String> = Vec::with_capacity(self.keys.len());

        while !remaining.is_empty() {
            let ready = remaining.iter().position(|key| {
                self.dependencies(key)
                    .unwrap_or_default()
                    .iter()
                    .all(|dep| done.contains(dep))
            });

            match ready {
                Some(pos) => done.push(remaining.remove(pos).clone()),
                // Unreachable once build() has rejected cycles
                None => break,
            }
        }

        done
    }

    /// Direct dependencies of a job, in declared order
    pub fn dependencies(&self, key: &str) -> Option<Vec<String>> {
        self.needs.get(key).cloned()
    }

    /// Jobs that directly depend on `key`, in pipeline order
    pub fn dependents(&self, key: &str) -> Option<Vec<String>> {
        let node = self.key_to_index.get(key)?;
        Some(self.ordered(self.graph.neighbors_directed(*node, Direction::Outgoing)))
    }

    /// Whether job A depends (directly or transitively) on job B
    pub fn depends_on(&self, job_a: &str, job_b: &str) -> bool {
        let Some(node_a) = self.key_to_index.get(job_a) else {
            return false;
        };
        let Some(node_b) = self.key_to_index.get(job_b) else {
            return false;
        };

        node_a != node_b
            && petgraph::algo::has_path_connecting(&self.graph, *node_b, *node_a, None)
    }

    fn ordered(&self, nodes: impl Iterator<Item = NodeIndex>) -> Vec<String> {
        let mut names: Vec<&String> = nodes.map(|n| &self.graph[n]).collect();
        names.sort_by_key(|name| self.keys.iter().position(|k| k == *name));
        names.into_iter().cloned().collect()
    }

    fn edges(&self) -> Vec<(String, String)> {
        let mut edges = Vec::new();
        for key in &self.keys {
            for dependency in self.dependencies(key).unwrap_or_default() {
                edges.push((dependency, key.clone()));
            }
        }
        edges
    }

    /// Mermaid flowchart of the declared edges
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for key in &self.keys {
            out.push_str(&format!("    {}[{}]\n", mermaid_id(key), key));
        }

        for (from, to) in self.edges() {
            out.push_str(&format!("    {} --> {}\n", mermaid_id(&from), mermaid_id(&to)));
        }

        out
    }

    /// Graphviz DOT rendering of the declared edges
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph workflow {\n");
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for (from, to) in self.edges() {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", from, to));
        }

        for key in &self.keys {
            let node = self.key_to_index[key];
            if self.graph.neighbors_undirected(node).count() == 0 {
                out.push_str(&format!("    \"{}\";\n", key));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Numbered list of jobs in dependency order
    pub fn to_text(&self, pipeline: &Pipeline) -> String {
        let mut out = String::new();

        for (i, key) in self.topological_order().iter().enumerate() {
            let runs_on = pipeline
                .job(key)
                .map(|job| job.runs_on.as_str())
                .unwrap_or_default();
            out.push_str(&format!("{}. {} ({})", i + 1, key, runs_on));

            let deps = self.dependencies(key).unwrap_or_default();
            if !deps.is_empty() {
                out.push_str(&format!(" [needs: {}]", deps.join(", ")));
            }

            out.push('\n');
        }

        out
    }
}

fn mermaid_id(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{machines, Job, Task};

    fn make_pipeline(jobs: Vec<(&str, Vec<&str>)>) -> Pipeline {
        let mut pipeline = Pipeline::new("test").unwrap();
        for (key, needs) in jobs {
            let mut job = Job::new(machines::UBUNTU_LATEST)
                .unwrap()
                .step(Task::checkout());
            for dep in needs {
                job = job.needs(dep).unwrap();
            }
            pipeline.add_job(key, job).unwrap();
        }
        pipeline
    }

    #[test]
    fn test_linear_order() {
        let pipeline = make_pipeline(vec![("c", vec!["b"]), ("b", vec!["a"]), ("a", vec![])]);

        let graph = JobGraph::build(&pipeline).unwrap();
        assert_eq!(graph.topological_order(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_diamond_order_is_stable() {
        let pipeline = make_pipeline(vec![
            ("a", vec![]),
            ("b", vec!["a"]),
            ("c", vec!["a"]),
            ("d", vec!["c", "b"]),
        ]);

        let graph = JobGraph::build(&pipeline).unwrap();
        assert_eq!(graph.topological_order(), vec!["a", "b", "c", "d"]);
        assert_eq!(graph.dependencies("d").unwrap(), vec!["c", "b"]);
        assert_eq!(graph.dependents("a").unwrap(), vec!["b", "c"]);
    }

    #[test]
    fn test_dependencies_keep_declared_needs_order() {
        let pipeline = make_pipeline(vec![
            ("lint", vec![]),
            ("test", vec![]),
            ("deploy", vec!["test", "lint"]),
        ]);

        let graph = JobGraph::build(&pipeline).unwrap();
        assert_eq!(graph.dependencies("deploy").unwrap(), vec!["test", "lint"]);
        assert!(graph.dependencies("missing").is_none());
        assert!(graph
            .to_text(&pipeline)
            .contains("3. deploy (ubuntu-latest) [needs: test, lint]"));
    }

    #[test]
    fn test_circular_dependency_detection() {
        let pipeline = make_pipeline(vec![("a", vec!["b"]), ("b", vec!["a"])]);

        match JobGraph::build(&pipeline) {
            Err(FlowError::CircularDependency { jobs }) => {
                assert!(jobs.contains(&"a".to_string()));
                assert!(jobs.contains(&"b".to_string()));
            }
            other => panic!("Expected CircularDependency, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let pipeline = make_pipeline(vec![("a", vec!["a"])]);
        assert!(matches!(
            JobGraph::build(&pipeline),
            Err(FlowError::CircularDependency { .. })
        ));
    }

    #[test]
    fn test_unknown_dependency() {
        let pipeline = make_pipeline(vec![("a", vec!["nonexistent"])]);

        match JobGraph::build(&pipeline) {
            Err(FlowError::UnknownDependency { job, dependency }) => {
                assert_eq!(job, "a");
                assert_eq!(dependency, "nonexistent");
            }
            other => panic!("Expected UnknownDependency, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_depends_on_check() {
        let pipeline = make_pipeline(vec![("a", vec![]), ("b", vec!["a"]), ("c", vec!["b"])]);
        let graph = JobGraph::build(&pipeline).unwrap();

        assert!(graph.depends_on("c", "a"));
        assert!(graph.depends_on("c", "b"));
        assert!(!graph.depends_on("a", "c"));
        assert!(!graph.depends_on("a", "a"));
        assert!(!graph.depends_on("a", "missing"));
    }

    #[test]
    fn test_renderings() {
        let pipeline = make_pipeline(vec![("build", vec![]), ("add-tag", vec!["build"])]);
        let graph = JobGraph::build(&pipeline).unwrap();

        let mermaid = graph.to_mermaid();
        assert!(mermaid.starts_with("graph TD\n"));
        assert!(mermaid.contains("build --> add_tag"));

        let dot = graph.to_dot();
        assert!(dot.contains("\"build\" -> \"add-tag\";"));

        let text = graph.to_text(&pipeline);
        assert_eq!(
            text,
            "1. build (ubuntu-latest)\n2. add-tag (ubuntu-latest) [needs: build]\n"
        );
    }
}
