use crate::{Result, SoundwalkError};

/// Lifecycle state of the shared audio destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphState {
    /// Created but not yet allowed to emit audio. Hosts keep graphs
    /// suspended until a user gesture arrives.
    Suspended,
    /// Resumed and audible.
    Running,
    /// Torn down by the host; resuming is impossible for this session.
    Closed,
}

/// The shared audio destination every track connects to.
///
/// Tracks never talk to the graph directly; the pipeline owns it, connects
/// gain paths when tracks register, and resumes it on the first user
/// gesture. Only the pipeline mutates graph topology.
#[derive(Debug)]
pub struct AudioGraph {
    state: GraphState,
    connections: usize,
}

impl AudioGraph {
    pub fn new() -> Self {
        Self {
            state: GraphState::Suspended,
            connections: 0,
        }
    }

    pub fn state(&self) -> GraphState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GraphState::Running
    }

    /// Number of gain paths connected to the destination. One per distinct
    /// registered source.
    pub fn connections(&self) -> usize {
        self.connections
    }

    /// Starts (or keeps) the graph running. Fails once the host has closed
    /// the graph; playback cannot proceed for the rest of the session.
    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            GraphState::Closed => Err(SoundwalkError::AudioGraphUnavailable(
                "the host closed the shared audio graph",
            )),
            _ => {
                self.state = GraphState::Running;
                Ok(())
            }
        }
    }

    /// Marks the graph as torn down by the host.
    pub fn close(&mut self) {
        self.state = GraphState::Closed;
    }

    pub(crate) fn connect(&mut self) {
        self.connections += 1;
    }
}

impl Default for AudioGraph {
    fn default() -> Self {
        Self::new()
    }
}
