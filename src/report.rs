use posterize::PosterizeError;

pub fn report_error(err: &PosterizeError) {
    eprintln!("Error: {err}");
    if err.is_config() {
        eprintln!();
        eprintln!("Check the conversion options:");
        eprintln!("  - --colors must be between 1 and 256 (1 selects black and white)");
        eprintln!("  - --threshold must be between 0 and 255");
        eprintln!("  - --fill accepts #rgb, #rrggbb or a color name such as `navy`");
    }
}
