//! Render-side scene graph stand-in
//!
//! Holds the visual nodes gameplay attaches and detaches. Nodes are addressed
//! by generational handles so a stale handle never reaches a recycled slot.

use std::fmt;

use firstshot_core::{Color, Transform, Vec3};
use serde::{Deserialize, Serialize};

/// A generational handle to a scene node
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle {
    index: u32,
    generation: u32,
}

impl VisualHandle {
    /// The slot index of this node
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation of this node (incremented on reuse)
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Visual({}v{})", self.index, self.generation)
    }
}

/// Node geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mesh {
    Sphere {
        radius: f32,
        z_samples: u32,
        radial_samples: u32,
    },
    Box {
        half_extents: Vec3,
    },
}

/// Physically based material parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub metallic: f32,
    pub roughness: f32,
    pub base_color: Color,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            metallic: 0.0,
            roughness: 0.5,
            base_color: Color::WHITE,
        }
    }
}

/// A renderable node
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
    pub transform: Transform,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Owns every attached node
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    len: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node, reusing a freed slot if available
    pub fn attach(&mut self, node: SceneNode) -> VisualHandle {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            VisualHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            VisualHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Detach a node. Detaching a stale or unknown handle returns `None`.
    pub fn detach(&mut self, handle: VisualHandle) -> Option<SceneNode> {
        let slot = self.slot_mut(handle)?;
        let node = slot.node.take()?;
        slot.generation += 1;
        self.free_list.push(handle.index);
        self.len -= 1;
        Some(node)
    }

    /// Whether a handle refers to an attached node
    pub fn contains(&self, handle: VisualHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&SceneNode> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, handle: VisualHandle) -> Option<&mut SceneNode> {
        self.slot_mut(handle).and_then(|slot| slot.node.as_mut())
    }

    /// Move a node. Returns false for a stale handle.
    pub fn set_transform(&mut self, handle: VisualHandle, transform: Transform) -> bool {
        match self.get_mut(handle) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Number of attached nodes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate attached nodes
    pub fn iter(&self) -> impl Iterator<Item = (VisualHandle, &SceneNode)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|node| {
                (
                    VisualHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    node,
                )
            })
        })
    }

    fn slot_mut(&mut self, handle: VisualHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
    }
}
