//! SketchRoom Core Library
//!
//! Shape model, pointer interaction, render scheduling and the room protocol
//! for the SketchRoom collaborative canvas. Platform-agnostic except for the
//! native WebSocket transport in `sync` and file snapshots.

pub mod camera;
pub mod collaboration;
pub mod collection;
pub mod editor;
pub mod geometry;
pub mod interaction;
pub mod protocol;
pub mod render;
pub mod selection;
pub mod shapes;
pub mod storage;
#[cfg(not(target_arch = "wasm32"))]
pub mod sync;
pub mod tools;

pub use camera::Camera;
pub use collaboration::{CollaborationManager, RoomEvent};
pub use collection::{CollectionEvent, ShapeCollection};
pub use editor::{Edit, Editor, EditorConfig};
pub use interaction::{Interaction, InteractionKind};
pub use protocol::{ClientMessage, InboundFrame, ProtocolError, ServerMessage};
pub use render::{RecordingSurface, RenderScheduler, Surface};
pub use selection::{Handle, HandleKind};
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeStyle, ShapeTrait};
pub use storage::{AutoSaveManager, MemoryStorage, SnapshotStore, StorageError};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(not(target_arch = "wasm32"))]
pub use sync::{ConnectionState, NativeWebSocket, SyncEvent};
pub use tools::{Cursor, ToolKind};
