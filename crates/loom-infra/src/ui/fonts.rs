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

//! Runtime font registration.

use std::path::Path;
use std::sync::Arc;

/// Accumulates fonts on top of `egui`'s defaults.
///
/// Each added font takes priority over the fonts already registered for
/// its family. Installing new fonts rebuilds the font atlas at the start of
/// the next pass, which the UI lane picks up as a dirty font image.
#[derive(Debug, Default)]
pub struct FontRegistry {
    definitions: egui::FontDefinitions,
}

impl FontRegistry {
    /// Starts from `egui`'s built-in fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// The definitions installed so far.
    pub fn definitions(&self) -> &egui::FontDefinitions {
        &self.definitions
    }

    /// Registers `data` (TTF/OTF bytes) under `name` and installs the fonts.
    pub fn add_font(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        data: Vec<u8>,
        family: egui::FontFamily,
    ) {
        self.install(ctx, name, egui::FontData::from_owned(data), family);
    }

    /// Reads a font file and registers it, scaled by `scale` relative to
    /// the size `egui` would render it at.
    pub fn add_font_file(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        path: impl AsRef<Path>,
        family: egui::FontFamily,
        scale: f32,
    ) -> std::io::Result<()> {
        let data = std::fs::read(path.as_ref())?;
        let mut font = egui::FontData::from_owned(data);
        font.tweak.scale = scale;
        self.install(ctx, name, font, family);
        Ok(())
    }

    fn install(
        &mut self,
        ctx: &egui::Context,
        name: &str,
        font: egui::FontData,
        family: egui::FontFamily,
    ) {
        self.definitions
            .font_data
            .insert(name.to_owned(), Arc::new(font));
        let names = self.definitions.families.entry(family).or_default();
        names.retain(|n| n != name);
        names.insert(0, name.to_owned());
        ctx.set_fonts(self.definitions.clone());
        log::info!("Registered font '{name}'");
    }
}
