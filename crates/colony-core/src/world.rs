use crate::{AgentId, BodyId, Vec3, VoxelCoord};

/// Read-only world access.
///
/// The kernel only requires an agent handle type. Subsystems (spatial queries, factions,
/// spawning, digging) define extension traits on top of this one.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}

/// Something an act or task can be aimed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target<A> {
    Agent(A),
    Body(BodyId),
    Voxel(VoxelCoord),
    Point(Vec3),
}

/// Geometry queries the act engine and the scheduler's cost function rely on.
pub trait SpatialView: WorldView {
    fn position(&self, agent: Self::Agent) -> Option<Vec3>;

    fn is_alive(&self, agent: Self::Agent) -> bool;

    fn body_position(&self, body: BodyId) -> Option<Vec3>;

    fn is_voxel_solid(&self, voxel: VoxelCoord) -> bool;

    /// A target is valid while it still exists: living agent, intact body, solid voxel.
    /// Points are always valid.
    fn is_target_valid(&self, target: Target<Self::Agent>) -> bool {
        match target {
            Target::Agent(a) => self.is_alive(a),
            Target::Body(b) => self.body_position(b).is_some(),
            Target::Voxel(v) => self.is_voxel_solid(v),
            Target::Point(_) => true,
        }
    }

    fn target_position(&self, target: Target<Self::Agent>) -> Option<Vec3> {
        match target {
            Target::Agent(a) => self.position(a),
            Target::Body(b) => self.body_position(b),
            Target::Voxel(v) => Some(v.center()),
            Target::Point(p) => Some(p),
        }
    }

    fn distance_to(&self, agent: Self::Agent, target: Target<Self::Agent>) -> Option<f32> {
        let from = self.position(agent)?;
        let to = self.target_position(target)?;
        Some(from.distance(to))
    }
}

pub trait SpatialMut: WorldMut + SpatialView {
    fn set_position(&mut self, agent: Self::Agent, position: Vec3);
}
