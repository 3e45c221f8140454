mod grid_vm;
mod play_vm;
mod puzzle_card_vm;

pub use grid_vm::{CellVm, WordVm, map_grid};
pub use play_vm::{
    CelebrationVm, FeedbackVm, PlayAction, PlaySnapshot, PlayVm, input_for_key, start_play,
};
pub use puzzle_card_vm::{
    AchievementVm, PuzzleCardVm, map_achievements, map_puzzle_cards,
};
