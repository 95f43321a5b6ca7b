pub mod install_tree;
