use nix::unistd::geteuid;

pub(super) fn is_elevated() -> bool {
    geteuid().is_root()
}
