//! Collaborator interfaces - score, goals, sound, effects
//!
//! The board never looks these up globally; they are handed to it once through
//! [`Collaborators`]. Every trait has a no-op implementation in [`NoopCollaborator`].

use crate::types::{Coord, ObstacleKind, TileColor};

/// What the goal tracker is told was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalTag {
    Color(TileColor),
    Obstacle(ObstacleKind),
}

pub trait ScoreTracker {
    fn increase_score(&mut self, amount: u32);
}

pub trait GoalTracker {
    fn notify_destroyed(&mut self, tag: GoalTag);
    fn refresh_goals(&mut self);
}

pub trait SoundCue {
    fn play_destroy(&mut self);
}

pub trait EffectSpawner {
    fn spawn_destroy_effect(&mut self, at: Coord);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCollaborator;

impl ScoreTracker for NoopCollaborator {
    fn increase_score(&mut self, _amount: u32) {}
}

impl GoalTracker for NoopCollaborator {
    fn notify_destroyed(&mut self, _tag: GoalTag) {}
    fn refresh_goals(&mut self) {}
}

impl SoundCue for NoopCollaborator {
    fn play_destroy(&mut self) {}
}

impl EffectSpawner for NoopCollaborator {
    fn spawn_destroy_effect(&mut self, _at: Coord) {}
}

/// The set of collaborators a board reports to
pub struct Collaborators {
    pub score: Box<dyn ScoreTracker>,
    pub goals: Box<dyn GoalTracker>,
    pub sound: Box<dyn SoundCue>,
    pub effects: Box<dyn EffectSpawner>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            score: Box::new(NoopCollaborator),
            goals: Box::new(NoopCollaborator),
            sound: Box::new(NoopCollaborator),
            effects: Box::new(NoopCollaborator),
        }
    }
}

impl Collaborators {
    pub fn with_score(mut self, score: impl ScoreTracker + 'static) -> Self {
        self.score = Box::new(score);
        self
    }

    pub fn with_goals(mut self, goals: impl GoalTracker + 'static) -> Self {
        self.goals = Box::new(goals);
        self
    }

    pub fn with_sound(mut self, sound: impl SoundCue + 'static) -> Self {
        self.sound = Box::new(sound);
        self
    }

    pub fn with_effects(mut self, effects: impl EffectSpawner + 'static) -> Self {
        self.effects = Box::new(effects);
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
