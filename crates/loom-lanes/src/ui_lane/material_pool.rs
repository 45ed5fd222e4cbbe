// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use loom_core::renderer::{MaterialInstanceId, ResourceError, UiRenderBackend};

/// Material instances reused across frames, one per batch slot.
///
/// Slot `i` always serves the `i`-th batch of a frame. The pool grows to
/// the largest batch count seen and is only emptied on release.
#[derive(Debug, Default)]
pub struct MaterialInstancePool {
    instances: Vec<MaterialInstanceId>,
}

impl MaterialInstancePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances owned.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// `true` when no instance was created yet.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The instance serving batch slot `slot`.
    pub fn get(&self, slot: usize) -> Option<MaterialInstanceId> {
        self.instances.get(slot).copied()
    }

    /// Creates instances until the pool holds at least `count`.
    pub fn grow_to(
        &mut self,
        backend: &dyn UiRenderBackend,
        count: usize,
    ) -> Result<(), ResourceError> {
        if self.instances.len() < count {
            log::debug!(
                "Growing UI material pool from {} to {count} instances",
                self.instances.len()
            );
        }
        while self.instances.len() < count {
            self.instances.push(backend.create_material_instance()?);
        }
        Ok(())
    }

    /// Destroys every instance.
    pub fn release(&mut self, backend: &dyn UiRenderBackend) {
        for instance in self.instances.drain(..) {
            backend.destroy_material_instance(instance);
        }
    }
}
