fn main() {
    // Compile the SLINT UI
    slint_build::compile("ui/map_window.slint").unwrap();
}
