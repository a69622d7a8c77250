use bumpmap_demo::flow;

fn main() {
    let config = flow::config_from_args(std::env::args().skip(1));
    if let Err(e) = flow::run(config) {
        println!("{e:#}");
        std::process::exit(1);
    }
}
