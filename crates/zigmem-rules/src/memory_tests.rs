use super::*;

fn analyzed(src: &str) -> (ScopeTracker, ContextClassifier) {
    (
        ScopeTracker::analyze_source(src),
        ContextClassifier::analyze_source(src),
    )
}

#[test]
fn test_m001_flags_unreleased_allocation() {
    let src = "\
fn run(a: Allocator) !void {
    const buf = try a.alloc(u8, 64);
    use_it(buf);
}
";
    let (tracker, _) = analyzed(src);
    let issues = check_missing_cleanup("src/run.zig", &tracker);
    assert_eq!(issues.len(), 1);
    let i = &issues[0];
    assert_eq!(i.code, "M001");
    assert_eq!(i.severity, "ERROR");
    assert_eq!(i.line, 2);
    assert_eq!(i.file, "src/run.zig");
    assert!(i.message.contains("buf"));
    assert!(i.fix_hint.as_deref().unwrap().contains("a.free(buf)"));
    assert_eq!(i.fingerprint.len(), 11);
}

#[test]
fn test_m001_clean_with_defer() {
    let src = "\
fn run(a: Allocator) !void {
    const buf = try a.alloc(u8, 64);
    defer a.free(buf);
}
";
    let (tracker, _) = analyzed(src);
    assert!(check_missing_cleanup("a.zig", &tracker).is_empty());
}

#[test]
fn test_m001_clean_with_errdefer_only() {
    let src = "\
fn run(a: Allocator) !void {
    const buf = try a.alloc(u8, 64);
    errdefer a.free(buf);
}
";
    let (tracker, _) = analyzed(src);
    assert!(check_missing_cleanup("a.zig", &tracker).is_empty());
}

#[test]
fn test_m001_exempts_ownership_transfer() {
    let src = "\
fn createBuffer(a: Allocator) ![]u8 {
    const buf = try a.alloc(u8, 64);
    return buf;
}
";
    let (tracker, _) = analyzed(src);
    assert!(check_missing_cleanup("a.zig", &tracker).is_empty());
}

#[test]
fn test_m001_exempts_arena_derived() {
    let src = "\
fn run(base: Allocator) !void {
    var arena = std.heap.ArenaAllocator.init(base);
    defer arena.deinit();
    const a = arena.allocator();
    const buf = try a.alloc(u8, 64);
    use_it(buf);
}
";
    let (tracker, _) = analyzed(src);
    assert!(check_missing_cleanup("a.zig", &tracker).is_empty());
}

#[test]
fn test_m001_skips_test_scopes() {
    let src = "\
test \"leaky\" {
    const buf = try std.testing.allocator.alloc(u8, 8);
    _ = buf;
}
";
    let (tracker, _) = analyzed(src);
    assert!(check_missing_cleanup("a.zig", &tracker).is_empty());
}

#[test]
fn test_m001_create_hint_uses_destroy() {
    let src = "\
fn run(a: Allocator) !void {
    const node = try a.create(Node);
    use_it(node);
}
";
    let (tracker, _) = analyzed(src);
    let issues = check_missing_cleanup("a.zig", &tracker);
    assert_eq!(issues.len(), 1);
    assert!(issues[0]
        .fix_hint
        .as_deref()
        .unwrap()
        .contains("a.destroy(node)"));
}

#[test]
fn test_m002_flags_fallible_escape() {
    let src = "\
fn loadConfig(a: Allocator) ![]u8 {
    const data = try a.alloc(u8, 512);
    return data;
}
";
    let (tracker, _) = analyzed(src);
    let issues = check_missing_errdefer("a.zig", src, &tracker);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, "M002");
    assert_eq!(issues[0].severity, "WARNING");
    assert!(issues[0].message.contains("data"));
}

#[test]
fn test_m002_clean_with_errdefer() {
    let src = "\
fn loadConfig(a: Allocator) ![]u8 {
    const data = try a.alloc(u8, 512);
    errdefer a.free(data);
    return data;
}
";
    let (tracker, _) = analyzed(src);
    assert!(check_missing_errdefer("a.zig", src, &tracker).is_empty());
}

#[test]
fn test_m002_requires_try() {
    let src = "\
fn makeId(a: Allocator) []u8 {
    const id = a.dupe(u8, seed);
    return id;
}
";
    let (tracker, _) = analyzed(src);
    assert!(check_missing_errdefer("a.zig", src, &tracker).is_empty());
}

#[test]
fn test_m003_flags_undeinitialized_arena() {
    let src = "\
fn run(base: Allocator) !void {
    var arena = std.heap.ArenaAllocator.init(base);
    const a = arena.allocator();
    _ = a;
}
";
    let (tracker, _) = analyzed(src);
    let issues = check_arena_leaks("a.zig", &tracker);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, "M003");
    assert_eq!(issues[0].line, 2);
    assert!(issues[0].fix_hint.as_deref().unwrap().contains("arena.deinit()"));
}

#[test]
fn test_m003_clean_with_deinit() {
    let src = "\
fn run(base: Allocator) !void {
    var arena = std.heap.ArenaAllocator.init(base);
    defer arena.deinit();
}
";
    let (tracker, _) = analyzed(src);
    assert!(check_arena_leaks("a.zig", &tracker).is_empty());
}

#[test]
fn test_m004_flags_discarded_allocation() {
    let src = "\
fn run(a: Allocator) !void {
    _ = try a.alloc(u8, 16);
}
";
    let (tracker, classifier) = analyzed(src);
    let issues = check_untracked_allocations("a.zig", src, &tracker, &classifier);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, "M004");
    assert_eq!(issues[0].severity, "INFO");
    assert_eq!(issues[0].line, 2);
}

#[test]
fn test_m004_rejects_match_in_comment() {
    let src = "\
fn run(a: Allocator) void {
    // const buf = a.alloc(u8, 16);
    noop();
}
";
    let (tracker, classifier) = analyzed(src);
    assert!(check_untracked_allocations("a.zig", src, &tracker, &classifier).is_empty());
}

#[test]
fn test_m004_rejects_match_in_string() {
    let src = "\
fn run() void {
    log(\"call a.alloc(u8, 16) yourself\");
}
";
    let (tracker, classifier) = analyzed(src);
    assert!(check_untracked_allocations("a.zig", src, &tracker, &classifier).is_empty());
}

#[test]
fn test_m004_skips_tracked_allocations() {
    let src = "\
fn run(a: Allocator) !void {
    const buf = try a.alloc(u8, 16);
    defer a.free(buf);
}
";
    let (tracker, classifier) = analyzed(src);
    assert!(check_untracked_allocations("a.zig", src, &tracker, &classifier).is_empty());
}
