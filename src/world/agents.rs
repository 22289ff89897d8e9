//! Agent identities and the per-agent state the neighbor queries read.

use smallvec::SmallVec;

/// Index of a patch in the flattened, row-major patch array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchId(pub usize);

/// Turtle identity ("who number"). Never reused after the turtle dies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurtleId(pub u64);

impl TurtleId {
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Breed tag. `BreedId::TURTLES` is the breed every turtle starts out in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreedId(pub u16);

impl BreedId {
    pub const TURTLES: Self = Self(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Patch,
    Turtle,
}

/// A reference to either kind of agent. Used for query origins and results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentRef {
    Patch(PatchId),
    Turtle(TurtleId),
}

impl AgentRef {
    pub fn kind(self) -> AgentKind {
        match self {
            AgentRef::Patch(_) => AgentKind::Patch,
            AgentRef::Turtle(_) => AgentKind::Turtle,
        }
    }

    pub fn as_turtle(self) -> Option<TurtleId> {
        match self {
            AgentRef::Turtle(id) => Some(id),
            AgentRef::Patch(_) => None,
        }
    }

    pub fn as_patch(self) -> Option<PatchId> {
        match self {
            AgentRef::Patch(id) => Some(id),
            AgentRef::Turtle(_) => None,
        }
    }
}

impl From<PatchId> for AgentRef {
    fn from(id: PatchId) -> Self {
        AgentRef::Patch(id)
    }
}

impl From<TurtleId> for AgentRef {
    fn from(id: TurtleId) -> Self {
        AgentRef::Turtle(id)
    }
}

/// A fixed grid cell. Coordinates never change; the residency list is
/// maintained by [`PatchWorld`](super::PatchWorld) as turtles move.
#[derive(Clone, Debug)]
pub struct Patch {
    pub(crate) id: PatchId,
    pub(crate) pxcor: i32,
    pub(crate) pycor: i32,
    pub(crate) turtles_here: SmallVec<[TurtleId; 4]>,
}

impl Patch {
    pub(crate) fn new(id: PatchId, pxcor: i32, pycor: i32) -> Self {
        Self {
            id,
            pxcor,
            pycor,
            turtles_here: SmallVec::new(),
        }
    }

    pub fn id(&self) -> PatchId {
        self.id
    }

    pub fn pxcor(&self) -> i32 {
        self.pxcor
    }

    pub fn pycor(&self) -> i32 {
        self.pycor
    }

    /// Turtles on this patch, in arrival order.
    pub fn turtles_here(&self) -> &[TurtleId] {
        &self.turtles_here
    }
}

/// A mobile agent with a continuous position.
#[derive(Clone, Debug, PartialEq)]
pub struct Turtle {
    pub(crate) id: TurtleId,
    pub(crate) x: f64,
    pub(crate) y: f64,
    /// Degrees, 0 = north (+y), clockwise, in `[0, 360)`.
    pub(crate) heading: f64,
    pub(crate) breed: BreedId,
    pub(crate) patch: PatchId,
}

impl Turtle {
    pub fn id(&self) -> TurtleId {
        self.id
    }

    pub fn xcor(&self) -> f64 {
        self.x
    }

    pub fn ycor(&self) -> f64 {
        self.y
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn breed(&self) -> BreedId {
        self.breed
    }

    /// The patch this turtle is currently resident on.
    pub fn patch_here(&self) -> PatchId {
        self.patch
    }
}

/// Registry of breed names. Index 0 is always `"turtles"`.
#[derive(Clone, Debug)]
pub struct Breeds {
    names: Vec<String>,
}

impl Default for Breeds {
    fn default() -> Self {
        Self {
            names: vec!["turtles".to_string()],
        }
    }
}

impl Breeds {
    /// Returns the existing tag when `name` is already registered.
    pub fn register(&mut self, name: &str) -> BreedId {
        if let Some(id) = self.named(name) {
            return id;
        }
        self.names.push(name.to_string());
        BreedId((self.names.len() - 1) as u16)
    }

    pub fn named(&self, name: &str) -> Option<BreedId> {
        self.names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|idx| BreedId(idx as u16))
    }

    pub fn name(&self, id: BreedId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Normalize a heading into `[0, 360)`.
pub fn normalize_heading(heading: f64) -> f64 {
    let h = heading.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}
