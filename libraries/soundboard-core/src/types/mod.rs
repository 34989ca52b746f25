mod event;
mod ids;
mod playlist;
mod selection;
mod sound;

pub use event::DocumentEvent;
pub use ids::{PlaylistId, SoundId};
pub use playlist::{NewPlaylist, Playlist, PlaylistCategory};
pub use selection::{clean_sound_name, SoundSelection};
pub use sound::{NewSound, Sound, SoundUpdate, SortUpdate, DEFAULT_SOUND_VOLUME, SORT_STEP};
