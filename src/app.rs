use std::sync::mpsc;

use log::{info, warn};

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::error::EditorResult;
use crate::event::EditorEvent;
use crate::input::InputHandler;
use crate::loader::PendingImage;
use crate::panels::{central_panel, tools_panel};
use crate::resizer::LinkedSize;
use crate::texture_manager::TextureManager;

/// eframe host around an [`Editor`]
pub struct EditorApp {
    pub(crate) editor: Editor,
    pub(crate) input: InputHandler,
    pub(crate) textures: TextureManager,
    events: mpsc::Receiver<EditorEvent>,
    /// Open resize dialog, if any
    pub(crate) resize: Option<LinkedSize>,
    pub(crate) pixel_size_text: String,
    pub(crate) history_status: String,
    pub(crate) load_error: Option<String>,
}

impl EditorApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> EditorResult<Self> {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> EditorResult<Self> {
        let editor = Editor::new(config)?;
        let (sender, events) = mpsc::channel();
        editor.events().subscribe(move |event: &EditorEvent| {
            let _ = sender.send(event.clone());
        });
        let pixel_size_text = editor.config().pixelize_pixel_size.clone();
        Ok(Self {
            editor,
            input: InputHandler::new(),
            textures: TextureManager::new(),
            events,
            resize: None,
            pixel_size_text,
            history_status: String::new(),
            load_error: None,
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                EditorEvent::HistoryChanged {
                    operations_done,
                    released_memory_operations,
                    ..
                } => {
                    self.history_status = format!(
                        "{} edits, {} released",
                        operations_done, released_memory_operations
                    );
                }
                EditorEvent::ImageLoaded => self.load_error = None,
                EditorEvent::ImageLoadFailed => {
                    self.load_error = Some("Could not load image".to_owned());
                }
                EditorEvent::Undone(_)
                | EditorEvent::Redone(_)
                | EditorEvent::SelectionChanged { .. } => {}
            }
        }
    }

    /// Files dropped on the window are opened as images
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if let Some(bytes) = file.bytes {
            self.editor.open_image(PendingImage::decode(bytes.to_vec()));
            return;
        }
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = file.path {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    info!("Opening {}", path.display());
                    self.editor.open_image(PendingImage::decode(bytes));
                }
                Err(err) => warn!("Failed to read {}: {}", path.display(), err),
            }
        }
    }
}

impl eframe::App for EditorApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.editor.poll();
        if self.editor.is_loading() {
            ctx.request_repaint();
        }
        self.drain_events();

        tools_panel(self, ctx);
        central_panel(self, ctx);

        for input in self.input.process_input(ctx) {
            self.editor.dispatch(input);
        }
    }
}
