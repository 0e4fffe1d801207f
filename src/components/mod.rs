pub mod node_editor;
pub mod node_list;
pub mod story_card;
pub mod story_graph;
