use kernel_core::kernel_passes;

pub fn run() {
    for (position, pass) in kernel_passes().iter().enumerate() {
        println!("{:>2}. {}", position + 1, pass.name());
    }
}
