use std::collections::HashMap;
use std::io::{Cursor, SeekFrom};

use args_vfs::{ArgsFS, HostFs};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // What an include handler would serve from memory.
    let mut headers = HashMap::new();
    headers.insert("./inc/common.h", b"#include \"inc/math.h\"\nfloat4 tint;\n".to_vec());
    headers.insert("./inc/math.h", b"float square(float x);\n".to_vec());

    let source = b"#include \"inc/common.h\"\nfloat4 main() : SV_Target { return tint; }\n";
    let mut fs = ArgsFS::with_resolver("main.hlsl", source.to_vec(), move |path: &str| {
        Ok(headers.get(path).cloned())
    });
    fs.set_search_paths(["inc"])?;
    fs.enable_display_include_process();
    fs.register_output_stream("out.bin", Cursor::new(Vec::<u8>::new()));

    // A frontend walking the include graph depth first.
    let mut pending = vec!["main.hlsl".to_string()];
    let mut preprocessed = String::new();
    while let Some(name) = pending.pop() {
        let handle = fs.open(&name)?;
        let fd = fs.open_os_handle(handle);
        fs.lseek(fd, SeekFrom::Start(0))?;

        let mut text = Vec::new();
        let mut chunk = [0u8; 64];
        loop {
            let n = fs.read(fd, &mut chunk)?;
            if n == 0 {
                break;
            }
            text.extend_from_slice(&chunk[..n]);
        }
        fs.close_handle(handle)?;

        for line in String::from_utf8(text)?.lines() {
            match line.strip_prefix("#include \"").and_then(|rest| rest.strip_suffix('"')) {
                Some(include) => pending.push(include.to_string()),
                None => {
                    preprocessed.push_str(line);
                    preprocessed.push('\n');
                }
            }
        }
    }

    println!("search dir ./inc is a directory: {}", fs.query_attributes("inc")?.is_dir());

    let output = fs.open("./out.bin")?;
    let out = fs.open_os_handle(output);
    fs.write(out, preprocessed.as_bytes())?;
    println!("output size: {}", fs.query_attributes("out.bin")?.size());

    let mut log = Vec::new();
    fs.write_stderr_to(&mut log)?;
    print!("{}", String::from_utf8_lossy(&log));
    Ok(())
}
