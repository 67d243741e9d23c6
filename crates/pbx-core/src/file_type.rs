//! `lastKnownFileType` values for common extensions.

use std::path::Path;

/// Xcode's file type identifier for `path`, judged by its extension.
pub fn last_known_file_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let file_type = match extension.as_str() {
        "swift" => "sourcecode.swift",
        "m" => "sourcecode.c.objc",
        "mm" => "sourcecode.cpp.objcpp",
        "h" => "sourcecode.c.h",
        "hpp" | "hh" => "sourcecode.cpp.h",
        "c" => "sourcecode.c.c",
        "cc" | "cpp" | "cxx" => "sourcecode.cpp.cpp",
        "metal" => "sourcecode.metal",
        "s" => "sourcecode.asm",
        "storyboard" => "file.storyboard",
        "xib" => "file.xib",
        "plist" => "text.plist.xml",
        "entitlements" => "text.plist.entitlements",
        "strings" => "text.plist.strings",
        "stringsdict" => "text.plist.stringsdict",
        "xcassets" => "folder.assetcatalog",
        "xcconfig" => "text.xcconfig",
        "xcdatamodeld" => "wrapper.xcdatamodel",
        "json" => "text.json",
        "md" => "net.daringfireball.markdown",
        "txt" => "text",
        "sh" => "text.script.sh",
        "png" => "image.png",
        "jpg" | "jpeg" => "image.jpeg",
        "pdf" => "image.pdf",
        "framework" => "wrapper.framework",
        "xcframework" => "wrapper.xcframework",
        "bundle" => "wrapper.plug-in",
        "a" => "archive.ar",
        "dylib" => "compiled.mach-o.dylib",
        "tbd" => "sourcecode.text-based-dylib-definition",
        "app" => "wrapper.application",
        "xctest" => "wrapper.cfbundle",
        _ => return None,
    };
    Some(file_type)
}
