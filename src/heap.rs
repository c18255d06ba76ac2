//! Object arena with generation-checked handles.
//!
//! Objects live in a slot vector and are addressed by `ObjectRef`, an index
//! plus the generation of the slot at allocation time. Freeing a slot bumps
//! its generation, so a stale handle is detected instead of aliasing whatever
//! reuses the slot. Collection is an explicit mark-and-sweep from caller
//! supplied roots; nothing runs behind the caller's back.

use crate::error::JsError;

/// Handle to an object record in the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    index: u32,
    generation: u32,
}

impl ObjectRef {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Types stored in the heap report the handles they hold.
pub trait Traceable {
    fn trace(&self, visit: &mut dyn FnMut(ObjectRef));
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Statistics from a collection cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub live: usize,
    pub freed: usize,
}

pub struct Heap<T: Traceable> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
    limit: usize,
}

impl<T: Traceable> Heap<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            limit,
        }
    }

    /// Number of live objects
    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn alloc(&mut self, value: T) -> Result<ObjectRef, JsError> {
        if self.live >= self.limit {
            tracing::warn!(limit = self.limit, "heap limit reached");
            return Err(JsError::memory_error(format!(
                "heap limit of {} objects reached",
                self.limit
            )));
        }

        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.value = Some(value);
                self.live += 1;
                return Ok(ObjectRef {
                    index,
                    generation: slot.generation,
                });
            }
        }

        let index = u32::try_from(self.slots.len())
            .map_err(|_| JsError::memory_error("heap index space exhausted"))?;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        self.live += 1;
        Ok(ObjectRef {
            index,
            generation: 0,
        })
    }

    pub fn contains(&self, r: ObjectRef) -> bool {
        self.get(r).is_ok()
    }

    pub fn get(&self, r: ObjectRef) -> Result<&T, JsError> {
        self.slots
            .get(r.index as usize)
            .filter(|slot| slot.generation == r.generation)
            .and_then(|slot| slot.value.as_ref())
            .ok_or_else(|| JsError::internal_error("stale object reference"))
    }

    pub fn get_mut(&mut self, r: ObjectRef) -> Result<&mut T, JsError> {
        self.slots
            .get_mut(r.index as usize)
            .filter(|slot| slot.generation == r.generation)
            .and_then(|slot| slot.value.as_mut())
            .ok_or_else(|| JsError::internal_error("stale object reference"))
    }

    /// Mark everything reachable from `roots` and free the rest.
    pub fn collect(&mut self, roots: &[ObjectRef]) -> HeapStats {
        let mut marked = vec![false; self.slots.len()];
        let mut worklist: Vec<ObjectRef> = roots.to_vec();

        while let Some(r) = worklist.pop() {
            let Some(slot) = self.slots.get(r.index as usize) else {
                continue;
            };
            if slot.generation != r.generation {
                continue;
            }
            let Some(value) = slot.value.as_ref() else {
                continue;
            };
            match marked.get_mut(r.index as usize) {
                Some(m) if !*m => *m = true,
                _ => continue,
            }
            value.trace(&mut |child| worklist.push(child));
        }

        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let is_marked = marked.get(index).copied().unwrap_or(false);
            if slot.value.is_some() && !is_marked {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                freed += 1;
            }
        }
        self.live -= freed;

        let stats = HeapStats {
            live: self.live,
            freed,
        };
        tracing::debug!(live = stats.live, freed = stats.freed, "heap collected");
        stats
    }
}
