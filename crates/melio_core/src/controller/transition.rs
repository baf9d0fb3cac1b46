use super::event::{Effect, Event, ENTRY_ANIMATION_DURATION};
use super::messages;
use super::state::{AppState, DragSession};
use crate::collision::find_merge_target;
use crate::gateway::PersistenceError;
use crate::model::block::{Block, BlockId, Position};
use crate::model::concept::Concept;
use crate::store::block_store::BlockPatch;
use crate::synth::{SynthesisError, SynthesisRequest};
use log::{debug, info, warn};

impl AppState {
    /// Applies one event and returns the effects the driver must execute.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::CanvasResized(canvas) => {
                self.canvas = canvas;
                Vec::new()
            }
            Event::AddBlock { text, position } => self.on_add_block(&text, position),
            Event::ToggleDeleteMode => {
                self.delete_mode = !self.delete_mode;
                debug!(
                    "event=delete_mode module=controller status=ok active={}",
                    self.delete_mode
                );
                Vec::new()
            }
            Event::PointerDown { block, pointer } => {
                self.on_pointer_down(block, pointer);
                Vec::new()
            }
            Event::PointerMove { pointer } => self.on_pointer_move(pointer),
            Event::PointerUp => {
                self.store.clear_dragging();
                self.drag = None;
                Vec::new()
            }
            Event::ToggleExpanded(id) => {
                if let Some(expanded) = self.store.find(id).map(|block| block.expanded) {
                    self.store.update(
                        id,
                        BlockPatch {
                            expanded: Some(!expanded),
                            ..BlockPatch::default()
                        },
                    );
                }
                Vec::new()
            }
            Event::DismissError => {
                self.error = None;
                Vec::new()
            }
            Event::SetAppearance(appearance) => {
                self.appearance = appearance;
                Vec::new()
            }
            Event::ClearAll => self.on_clear_all(),
            Event::EntryAnimationElapsed(id) => {
                self.store.update(
                    id,
                    BlockPatch {
                        just_created: Some(false),
                        ..BlockPatch::default()
                    },
                );
                Vec::new()
            }
            Event::SynthesisCompleted {
                placeholder,
                result,
            } => self.on_synthesis_completed(placeholder, result),
            Event::ConceptPersisted(result) => {
                match result {
                    Ok(concept) => self.concepts.push(concept),
                    Err(err) => self.fail_persistence("concept_append", &err, messages::CONCEPT_SAVE_FAILED),
                }
                Vec::new()
            }
            Event::ConceptsLoaded(result) => {
                self.on_concepts_loaded(result);
                Vec::new()
            }
            Event::ConceptsCleared(result) => {
                self.on_concepts_cleared(result);
                Vec::new()
            }
            Event::SessionEstablished(session) => {
                info!("event=session_ready module=controller status=ok");
                self.session = Some(session.clone());
                vec![Effect::LoadConcepts { session }]
            }
            Event::SessionFailed(err) => {
                warn!("event=session_ready module=controller status=error error={err}");
                self.error = Some(messages::SIGN_IN_FAILED.to_string());
                Vec::new()
            }
        }
    }

    fn on_add_block(&mut self, text: &str, position: Option<Position>) -> Vec<Effect> {
        match self.store.create(text, position, &self.canvas) {
            Ok(id) => {
                self.error = None;
                info!(
                    "event=block_create module=controller status=ok block_id={id} text_chars={}",
                    text.trim().chars().count()
                );
                vec![Effect::ScheduleEntryAnimationEnd {
                    block: id,
                    after: ENTRY_ANIMATION_DURATION,
                }]
            }
            Err(err) => {
                warn!("event=block_create module=controller status=error error={err}");
                self.error = Some(messages::EMPTY_BLOCK_TEXT.to_string());
                Vec::new()
            }
        }
    }

    fn on_pointer_down(&mut self, id: BlockId, pointer: Position) {
        let Some(block) = self.store.find(id) else {
            debug!("event=pointer_down module=controller status=skip reason=not_found block_id={id}");
            return;
        };
        if !block.is_draggable() {
            debug!("event=pointer_down module=controller status=skip reason=generating block_id={id}");
            return;
        }
        let origin = block.position;

        if self.delete_mode {
            self.store.remove(id);
            self.error = None;
            info!("event=block_delete module=controller status=ok block_id={id}");
            return;
        }

        // A second pointer-down ends any previous drag first.
        self.store.clear_dragging();
        self.store.update(
            id,
            BlockPatch {
                dragging: Some(true),
                ..BlockPatch::default()
            },
        );
        self.drag = Some(DragSession {
            block: id,
            offset: pointer.offset_from(origin),
        });
    }

    fn on_pointer_move(&mut self, pointer: Position) -> Vec<Effect> {
        let Some(session) = self.drag else {
            return Vec::new();
        };
        if self.delete_mode {
            return Vec::new();
        }

        let position = self
            .canvas
            .clamp_block_origin(pointer.offset_from(session.offset));
        let moved = self.store.update(
            session.block,
            BlockPatch {
                position: Some(position),
                ..BlockPatch::default()
            },
        );
        if !moved {
            self.drag = None;
            return Vec::new();
        }

        let Some(dragged) = self.store.find(session.block).cloned() else {
            return Vec::new();
        };
        match find_merge_target(&self.store, &dragged, self.footprint).cloned() {
            Some(target) => self.merge(dragged, target),
            None => Vec::new(),
        }
    }

    fn merge(&mut self, dragged: Block, target: Block) -> Vec<Effect> {
        let placeholder = Block::placeholder(dragged.position.midpoint(target.position));
        let placeholder_id = placeholder.id;

        if self
            .store
            .replace_pair(dragged.id, target.id, placeholder)
            .is_none()
        {
            warn!(
                "event=block_merge module=controller status=skip reason=source_missing dragged={} target={}",
                dragged.id, target.id
            );
            return Vec::new();
        }

        self.drag = None;
        self.error = None;
        info!(
            "event=block_merge module=controller status=start dragged={} target={} placeholder={placeholder_id}",
            dragged.id, target.id
        );

        vec![
            Effect::Synthesize {
                placeholder: placeholder_id,
                request: SynthesisRequest::from_sources(dragged.text, target.text),
            },
            Effect::ScheduleEntryAnimationEnd {
                block: placeholder_id,
                after: ENTRY_ANIMATION_DURATION,
            },
        ]
    }

    fn on_synthesis_completed(
        &mut self,
        placeholder: BlockId,
        result: Result<String, SynthesisError>,
    ) -> Vec<Effect> {
        let Some(expanded) = self.store.find(placeholder).map(|block| block.expanded) else {
            debug!(
                "event=block_merge module=controller status=skip reason=placeholder_gone placeholder={placeholder}"
            );
            return Vec::new();
        };

        match result {
            Ok(text) => {
                self.store.update(
                    placeholder,
                    BlockPatch {
                        text: Some(text.clone()),
                        generating: Some(false),
                        ..BlockPatch::default()
                    },
                );
                info!("event=block_merge module=controller status=ok placeholder={placeholder}");

                match &self.session {
                    Some(session) => vec![Effect::PersistConcept {
                        session: session.clone(),
                        text,
                    }],
                    None => {
                        info!("event=concept_append module=controller status=skip reason=no_session");
                        Vec::new()
                    }
                }
            }
            Err(err) => {
                self.store.update(
                    placeholder,
                    BlockPatch {
                        text: Some(err.placeholder_text().to_string()),
                        generating: Some(false),
                        expanded: Some(expanded),
                        ..BlockPatch::default()
                    },
                );
                warn!(
                    "event=block_merge module=controller status=error placeholder={placeholder} error_code={}",
                    err.code()
                );
                self.error = Some(err.user_message().to_string());
                Vec::new()
            }
        }
    }

    fn on_clear_all(&mut self) -> Vec<Effect> {
        match &self.session {
            Some(session) => vec![Effect::DeleteAllConcepts {
                session: session.clone(),
            }],
            None => {
                self.fail_persistence(
                    "clear_all",
                    &PersistenceError::Unavailable,
                    messages::STORAGE_NOT_READY,
                );
                Vec::new()
            }
        }
    }

    fn on_concepts_loaded(&mut self, result: Result<Vec<Concept>, PersistenceError>) {
        match result {
            Ok(concepts) => {
                debug!(
                    "event=concept_list module=controller status=ok count={}",
                    concepts.len()
                );
                self.concepts = concepts;
            }
            Err(err) => self.fail_persistence("concept_list", &err, messages::CONCEPTS_LOAD_FAILED),
        }
    }

    fn on_concepts_cleared(&mut self, result: Result<usize, PersistenceError>) {
        match result {
            Ok(removed) => {
                let blocks = self.store.remove_all();
                self.concepts.clear();
                self.drag = None;
                self.error = None;
                info!(
                    "event=clear_all module=controller status=ok blocks_removed={blocks} concepts_removed={removed}"
                );
            }
            Err(err) => self.fail_persistence("clear_all", &err, messages::CONCEPTS_CLEAR_FAILED),
        }
    }

    fn fail_persistence(&mut self, event: &str, err: &PersistenceError, message: &str) {
        warn!(
            "event={event} module=controller status=error error_code={} error={err}",
            err.code()
        );
        self.error = Some(message.to_string());
    }
}
